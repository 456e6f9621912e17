//! # Font Details
//!
//! Per-document state for one embedded TrueType font. Text is converted to
//! the 2-byte glyph codes written into content streams, and every glyph
//! that goes out is remembered with its width and source text. When the
//! document is finished, [`FontDetails::embed`] produces everything the PDF
//! font objects need: the (subset) font program, its name, the `/W` array,
//! the ToUnicode CMap and the descriptor metrics.

use std::collections::{BTreeMap, HashSet};

use crate::error::Result;
use crate::font::unicode::{
    index_used, subset_prefix, to_unicode_cmap, width_array, width_runs, UnicodeFont, UsedGlyph,
};
use crate::font::{SubsetOptions, TrueTypeFont};

/// PDF font descriptor flags.
const FLAG_FIXED_PITCH: u32 = 1;
const FLAG_SYMBOLIC: u32 = 4;
const FLAG_NONSYMBOLIC: u32 = 32;
const FLAG_ITALIC: u32 = 64;
const FLAG_FORCE_BOLD: u32 = 1 << 18;

/// Metrics for the `/FontDescriptor`, in 1/1000 em.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorMetrics {
    pub flags: u32,
    pub bbox: [i32; 4],
    pub italic_angle: f64,
    pub ascent: i32,
    pub descent: i32,
    pub cap_height: i32,
    pub stem_v: u32,
}

impl DescriptorMetrics {
    pub fn from_font(font: &TrueTypeFont) -> Self {
        let m = font.metrics();

        let mut flags = if font.is_font_specific() {
            FLAG_SYMBOLIC
        } else {
            FLAG_NONSYMBOLIC
        };
        if m.fixed_pitch {
            flags |= FLAG_FIXED_PITCH;
        }
        if m.italic_angle != 0.0 {
            flags |= FLAG_ITALIC;
        }
        if m.bold {
            flags |= FLAG_FORCE_BOLD;
        }

        Self {
            flags,
            bbox: m.bbox,
            italic_angle: m.italic_angle,
            ascent: m.ascent,
            descent: m.descent,
            cap_height: m.cap_height,
            stem_v: if m.bold { 120 } else { 80 },
        }
    }
}

/// Everything needed to write one Type0 / CIDFontType2 font into a PDF.
#[derive(Debug, Clone)]
pub struct FontEmbedding {
    /// `/BaseFont`, with the subset prefix when subset.
    pub base_font: String,
    /// The sfnt program for `/FontFile2`.
    pub font_data: Vec<u8>,
    pub subset: bool,
    /// `/W` array text; `None` when every glyph has the default width.
    pub widths: Option<String>,
    /// ToUnicode CMap text; `None` when no glyph carries text.
    pub to_unicode: Option<String>,
    pub descriptor: DescriptorMetrics,
}

#[derive(Debug, Clone)]
pub struct FontDetails {
    font: UnicodeFont,
    used: BTreeMap<u16, UsedGlyph>,
    subset: bool,
    options: SubsetOptions,
}

impl FontDetails {
    pub fn new(font: TrueTypeFont) -> Self {
        Self {
            font: UnicodeFont::new(font),
            used: BTreeMap::new(),
            subset: true,
            options: SubsetOptions::default(),
        }
    }

    /// Embed the whole font instead of a subset.
    pub fn with_subset(mut self, subset: bool) -> Self {
        self.subset = subset;
        self
    }

    pub fn with_options(mut self, options: SubsetOptions) -> Self {
        self.options = options;
        self
    }

    pub fn font(&self) -> &UnicodeFont {
        &self.font
    }

    /// Glyphs used so far, by glyph id.
    pub fn used_glyphs(&self) -> impl Iterator<Item = &UsedGlyph> {
        self.used.values()
    }

    /// Convert text to the bytes of a shown string and record the glyphs.
    ///
    /// Each glyph is written as its 2-byte big-endian id. Characters the
    /// font has no glyph for are skipped. The first text recorded for a
    /// glyph is the one the ToUnicode CMap reports.
    pub fn convert_to_bytes(&mut self, text: &str) -> Vec<u8> {
        let glyphs = self.font.text_to_glyphs(text);
        let mut out = Vec::with_capacity(glyphs.len() * 2);
        for g in glyphs {
            out.extend_from_slice(&g.code.to_be_bytes());
            self.used.entry(g.code).or_insert(UsedGlyph {
                glyph: g.code,
                width: g.width,
                text: g.chars,
            });
        }
        out
    }

    /// Mark glyphs as used by id, e.g. glyphs placed by a shaper. Ids past
    /// the font's glyph count are ignored.
    pub fn add_glyphs(&mut self, glyphs: impl IntoIterator<Item = u16>) {
        let font = self.font.font();
        let num_glyphs = font.metrics().num_glyphs;
        let added = glyphs.into_iter().filter_map(|glyph| {
            if glyph >= num_glyphs {
                log::warn!("glyph {} is outside the font ({} glyphs), ignored", glyph, num_glyphs);
                return None;
            }
            Some(UsedGlyph {
                glyph,
                width: font.glyph_width(glyph),
                text: String::new(),
            })
        });
        for (glyph, used) in index_used(added) {
            self.used.entry(glyph).or_insert(used);
        }
    }

    /// Produce the font program and the dictionaries' contents.
    pub fn embed(&self) -> Result<FontEmbedding> {
        let font = self.font.font();
        let (font_data, prefix) = if self.subset {
            let glyphs: HashSet<u16> = self.used.keys().copied().collect();
            let result = font.subset(glyphs, self.options)?;
            let prefix = subset_prefix(result.retained_glyphs.iter().copied());
            (result.font_data, prefix)
        } else {
            (font.full_font_data()?, String::new())
        };

        let embedding = FontEmbedding {
            base_font: format!("{}{}", prefix, font.postscript_name()),
            font_data,
            subset: self.subset,
            widths: width_array(&width_runs(self.used.values())),
            to_unicode: to_unicode_cmap(self.used.values()),
            descriptor: DescriptorMetrics::from_font(font),
        };
        log::debug!(
            "embedding '{}': {} glyphs used, {} font bytes",
            embedding.base_font,
            self.used.len(),
            embedding.font_data.len()
        );
        Ok(embedding)
    }
}
