//! # PDF Font Objects
//!
//! Writes a [`FontEmbedding`] as the five objects of a Type0 font:
//!
//! ```text
//! Type0 (/Encoding /Identity-H)
//!   ├── /DescendantFonts → CIDFontType2 (/W, /DW 1000, /CIDToGIDMap /Identity)
//!   │                        └── /FontDescriptor → FontDescriptor
//!   │                                                └── /FontFile2 → stream
//!   └── /ToUnicode → stream
//! ```
//!
//! Objects go into an [`ObjectSink`], which hands out object numbers. The
//! document writer owns the sink; [`ObjectList`] is a plain in-memory one
//! that can also dump its objects as PDF text.
//!
//! Streams are Flate-compressed with `miniz_oxide`.

use std::fmt::Write as _;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::details::FontEmbedding;
use crate::font::unicode::DEFAULT_WIDTH;

/// Receives finished PDF objects and assigns their object numbers.
pub trait ObjectSink {
    /// Store an object's body (everything between `obj` and `endobj`) and
    /// return its object number.
    fn add_object(&mut self, data: Vec<u8>) -> usize;
}

/// Objects in memory, numbered from 1 in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ObjectList {
    objects: Vec<Vec<u8>>,
}

impl ObjectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Body of object `id`.
    pub fn get(&self, id: usize) -> Option<&[u8]> {
        id.checked_sub(1)
            .and_then(|i| self.objects.get(i))
            .map(Vec::as_slice)
    }

    /// All objects as `N 0 obj ... endobj` blocks.
    pub fn serialize(&self) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        for (i, data) in self.objects.iter().enumerate() {
            let header = format!("{} 0 obj\n", i + 1);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }
        output
    }
}

impl ObjectSink for ObjectList {
    fn add_object(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len()
    }
}

/// Object numbers of a written font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontObjects {
    /// The Type0 font, referenced from page `/Resources`.
    pub font: usize,
    pub descendant: usize,
    pub descriptor: usize,
    pub font_file: usize,
    pub to_unicode: Option<usize>,
}

/// Write the font's objects into `sink`.
pub fn write_font_objects(sink: &mut dyn ObjectSink, embedding: &FontEmbedding) -> FontObjects {
    let font_name = sanitize_font_name(&embedding.base_font);

    // 1. FontFile2 stream
    let font_file = sink.add_object(stream_object(
        &format!("/Length1 {}", embedding.font_data.len()),
        &embedding.font_data,
    ));

    // 2. FontDescriptor
    let d = &embedding.descriptor;
    let descriptor = sink.add_object(
        format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags {} \
             /FontBBox [{} {} {} {}] /ItalicAngle {} \
             /Ascent {} /Descent {} /CapHeight {} /StemV {} \
             /FontFile2 {} 0 R >>",
            font_name,
            d.flags,
            d.bbox[0],
            d.bbox[1],
            d.bbox[2],
            d.bbox[3],
            format_number(d.italic_angle),
            d.ascent,
            d.descent,
            d.cap_height,
            d.stem_v,
            font_file,
        )
        .into_bytes(),
    );

    // 3. CIDFontType2
    let mut cid_font = format!(
        "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
         /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
         /FontDescriptor {} 0 R /DW {}",
        font_name, descriptor, DEFAULT_WIDTH,
    );
    if let Some(widths) = &embedding.widths {
        let _ = write!(cid_font, " /W {}", widths);
    }
    cid_font.push_str(" /CIDToGIDMap /Identity >>");
    let descendant = sink.add_object(cid_font.into_bytes());

    // 4. ToUnicode
    let to_unicode = embedding
        .to_unicode
        .as_ref()
        .map(|cmap| sink.add_object(stream_object("", cmap.as_bytes())));

    // 5. Type0
    let mut type0 = format!(
        "<< /Type /Font /Subtype /Type0 /BaseFont /{} \
         /Encoding /Identity-H /DescendantFonts [{} 0 R]",
        font_name, descendant,
    );
    if let Some(id) = to_unicode {
        let _ = write!(type0, " /ToUnicode {} 0 R", id);
    }
    type0.push_str(" >>");
    let font = sink.add_object(type0.into_bytes());

    log::debug!("wrote font '{}' as object {}", font_name, font);
    FontObjects {
        font,
        descendant,
        descriptor,
        font_file,
        to_unicode,
    }
}

/// A Flate-compressed stream object; `extra` goes into the dictionary.
fn stream_object(extra: &str, data: &[u8]) -> Vec<u8> {
    let compressed = compress_to_vec_zlib(data, 6);
    let mut out: Vec<u8> = Vec::new();
    let extra = if extra.is_empty() {
        String::new()
    } else {
        format!(" {}", extra)
    };
    out.extend_from_slice(
        format!(
            "<< /Length {}{} /Filter /FlateDecode >>\nstream\n",
            compressed.len(),
            extra
        )
        .as_bytes(),
    );
    out.extend_from_slice(&compressed);
    out.extend_from_slice(b"\nendstream");
    out
}

/// Keep only characters that need no escaping in a PDF name.
fn sanitize_font_name(name: &str) -> String {
    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.' | ','))
        .collect();
    if name.is_empty() {
        "CustomFont".to_string()
    } else {
        name
    }
}

/// Integers without a fractional part, others with up to 4 decimals.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.4}", value);
        s.trim_end_matches('0').to_string()
    }
}
