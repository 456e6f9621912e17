//! # Document Fonts
//!
//! A font as found in an existing PDF: character codes come from content
//! streams and must be turned back into text and widths.
//!
//! Text is resolved in this order:
//! 1. The font's `/ToUnicode` CMap, or for `Identity-H` fonts of a known
//!    Adobe collection the predefined `Uni*-UCS2-H` CMap, inverted
//! 2. The embedded font's own `cmap`, inverted
//! 3. The code itself (`Identity` CIDs and Latin-1 bytes pass through)
//!
//! The space character is special: a font that reports a zero width for it
//! gets the average of its non-zero widths instead.

use std::collections::HashMap;

use crate::cmap::{cid_to_unicode, CMap, CMapResources};
use crate::error::Result;
use crate::font::TrueTypeFont;

/// How shown strings are split into character codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeEncoding {
    /// Two-byte codes that are CIDs (`Identity-H` / `Identity-V`).
    Identity,
    /// One byte per code (simple fonts).
    SingleByte,
}

/// Collects what a PDF font dictionary says about a font.
pub struct DocumentFontBuilder<'a> {
    encoding: CodeEncoding,
    to_unicode: Option<Vec<u8>>,
    cid_system: Option<(String, String)>,
    resources: Option<&'a dyn CMapResources>,
    font: Option<TrueTypeFont>,
    widths: HashMap<u32, u32>,
    default_width: u32,
}

impl<'a> DocumentFontBuilder<'a> {
    /// Raw bytes of the `/ToUnicode` stream (already decompressed).
    pub fn to_unicode(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.to_unicode = Some(data.into());
        self
    }

    /// `/CIDSystemInfo` registry and ordering, with the place to load
    /// predefined CMaps from.
    pub fn cid_system(
        mut self,
        registry: &str,
        ordering: &str,
        resources: &'a dyn CMapResources,
    ) -> Self {
        self.cid_system = Some((registry.to_string(), ordering.to_string()));
        self.resources = Some(resources);
        self
    }

    /// The embedded font program.
    pub fn font(mut self, font: TrueTypeFont) -> Self {
        self.font = Some(font);
        self
    }

    /// Widths from `/W` or `/Widths`, keyed by code (CID for Identity).
    pub fn widths(mut self, widths: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.widths.extend(widths);
        self
    }

    /// `/DW` (or `/MissingWidth` for simple fonts).
    pub fn default_width(mut self, width: u32) -> Self {
        self.default_width = width;
        self
    }

    pub fn build(self) -> Result<DocumentFont> {
        let to_unicode = match &self.to_unicode {
            Some(data) => Some(CMap::parse(data)?),
            None => None,
        };
        let cid_unicode = match (&to_unicode, self.encoding, &self.cid_system, self.resources) {
            (None, CodeEncoding::Identity, Some((registry, ordering)), Some(resources)) => {
                cid_to_unicode(resources, registry, ordering)?
            }
            _ => None,
        };
        let glyph_unicode = match (&self.font, self.encoding) {
            (Some(font), CodeEncoding::Identity) => font.cmaps().glyph_to_unicode(),
            _ => HashMap::new(),
        };

        let mut font = DocumentFont {
            encoding: self.encoding,
            to_unicode,
            cid_unicode,
            glyph_unicode,
            font: self.font,
            widths: self.widths,
            default_width: self.default_width,
            space_code: None,
            space_width: 0,
        };
        font.space_code = font.find_space_code();
        let reported = font.space_code.map(|c| font.raw_width(c)).unwrap_or(0);
        font.space_width = if reported != 0 {
            reported
        } else {
            font.average_width()
        };
        log::debug!(
            "document font: {:?} encoding, space code {:?}, space width {}",
            font.encoding,
            font.space_code,
            font.space_width
        );
        Ok(font)
    }
}

#[derive(Debug, Clone)]
pub struct DocumentFont {
    encoding: CodeEncoding,
    to_unicode: Option<CMap>,
    /// CID → text from a predefined CMap.
    cid_unicode: Option<HashMap<u32, String>>,
    /// Glyph → code point from the embedded font (Identity fonts).
    glyph_unicode: HashMap<u16, u32>,
    font: Option<TrueTypeFont>,
    widths: HashMap<u32, u32>,
    default_width: u32,
    space_code: Option<u32>,
    space_width: u32,
}

impl DocumentFont {
    pub fn builder<'a>(encoding: CodeEncoding) -> DocumentFontBuilder<'a> {
        DocumentFontBuilder {
            encoding,
            to_unicode: None,
            cid_system: None,
            resources: None,
            font: None,
            widths: HashMap::new(),
            default_width: match encoding {
                CodeEncoding::Identity => 1000,
                CodeEncoding::SingleByte => 0,
            },
        }
    }

    pub fn encoding(&self) -> CodeEncoding {
        self.encoding
    }

    pub fn has_to_unicode(&self) -> bool {
        self.to_unicode.is_some() || self.cid_unicode.is_some()
    }

    /// Split a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        match (self.encoding, &self.to_unicode) {
            (CodeEncoding::Identity, _) => bytes
                .chunks(2)
                .map(|c| c.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32))
                .collect(),
            (CodeEncoding::SingleByte, Some(cmap)) => cmap.codes(bytes),
            (CodeEncoding::SingleByte, None) => bytes.iter().map(|&b| b as u32).collect(),
        }
    }

    /// Text for one character code.
    pub fn unicode_for(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
            return Some(text.to_string());
        }
        if let Some(text) = self.cid_unicode.as_ref().and_then(|m| m.get(&code)) {
            return Some(text.clone());
        }
        match self.encoding {
            CodeEncoding::Identity => {
                let glyph = u16::try_from(code).ok()?;
                if let Some(&c) = self.glyph_unicode.get(&glyph) {
                    return char::from_u32(c).map(String::from);
                }
                // The code is the CID: pass it through
                char::from_u32(code).map(String::from)
            }
            CodeEncoding::SingleByte => {
                let code = u8::try_from(code).ok()?;
                let mac = self.font.as_ref().is_some_and(|f| f.cmaps().mac_roman);
                let c = if mac {
                    char::from_u32(MAC_ROMAN[code as usize] as u32).filter(|&c| c != '\0')?
                } else {
                    code as char
                };
                Some(c.to_string())
            }
        }
    }

    /// Decode a shown string to text. Codes without text are dropped.
    pub fn decode(&self, bytes: &[u8]) -> String {
        self.codes(bytes)
            .into_iter()
            .filter_map(|code| self.unicode_for(code))
            .collect()
    }

    /// Width of a character code in 1/1000 em.
    pub fn width(&self, code: u32) -> u32 {
        if Some(code) == self.space_code {
            return if self.space_width != 0 {
                self.space_width
            } else {
                self.default_width
            };
        }
        self.raw_width(code)
    }

    /// Width of the space character, after the zero-width fallback.
    pub fn space_width(&self) -> u32 {
        self.space_width
    }

    /// Width as the font reports it: explicit widths, then the embedded
    /// font, then the default width.
    fn raw_width(&self, code: u32) -> u32 {
        if let Some(&w) = self.widths.get(&code) {
            return w;
        }
        let from_font = self.font.as_ref().and_then(|font| match self.encoding {
            CodeEncoding::Identity => {
                let glyph = u16::try_from(code).ok()?;
                (glyph < font.metrics().num_glyphs).then(|| font.glyph_width(glyph))
            }
            CodeEncoding::SingleByte => font.char_metric(code).map(|m| m.width),
        });
        from_font.unwrap_or(self.default_width)
    }

    /// The code that shows a space, if the font has one.
    fn find_space_code(&self) -> Option<u32> {
        match self.encoding {
            CodeEncoding::SingleByte => Some(0x20),
            CodeEncoding::Identity => {
                let from_cmap = self.to_unicode.as_ref().and_then(|cmap| {
                    cmap.unicode
                        .iter()
                        .filter(|(_, text)| text.as_str() == " ")
                        .map(|(&code, _)| code)
                        .min()
                });
                from_cmap.or_else(|| {
                    self.font
                        .as_ref()
                        .and_then(|f| f.char_metric(0x20))
                        .map(|m| m.glyph as u32)
                })
            }
        }
    }

    /// Truncating mean of all non-zero widths, or 0 if there are none.
    ///
    /// Explicit widths are used when the dictionary gives any; otherwise
    /// every glyph of the embedded font counts.
    pub fn average_width(&self) -> u32 {
        let widths: Vec<u32> = if !self.widths.is_empty() {
            self.widths.values().copied().collect()
        } else if let Some(font) = &self.font {
            (0..font.metrics().num_glyphs).map(|g| font.glyph_width(g)).collect()
        } else {
            Vec::new()
        };
        let (total, count) = widths
            .iter()
            .filter(|&&w| w != 0)
            .fold((0u64, 0u64), |(t, n), &w| (t + w as u64, n + 1));
        if count == 0 {
            0
        } else {
            (total / count) as u32
        }
    }
}

// ─── Mac Roman ──────────────────────────────────────────────────

/// Mac Roman byte → Unicode. Undefined control codes map to 0.
const MAC_ROMAN: [u16; 256] = [
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0020, 0x0021, 0x0022, 0x0023,
    0x0024, 0x0025, 0x0026, 0x0027, 0x0028, 0x0029, 0x002A, 0x002B, 0x002C, 0x002D, 0x002E, 0x002F,
    0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037, 0x0038, 0x0039, 0x003A, 0x003B,
    0x003C, 0x003D, 0x003E, 0x003F, 0x0040, 0x0041, 0x0042, 0x0043, 0x0044, 0x0045, 0x0046, 0x0047,
    0x0048, 0x0049, 0x004A, 0x004B, 0x004C, 0x004D, 0x004E, 0x004F, 0x0050, 0x0051, 0x0052, 0x0053,
    0x0054, 0x0055, 0x0056, 0x0057, 0x0058, 0x0059, 0x005A, 0x005B, 0x005C, 0x005D, 0x005E, 0x005F,
    0x0060, 0x0061, 0x0062, 0x0063, 0x0064, 0x0065, 0x0066, 0x0067, 0x0068, 0x0069, 0x006A, 0x006B,
    0x006C, 0x006D, 0x006E, 0x006F, 0x0070, 0x0071, 0x0072, 0x0073, 0x0074, 0x0075, 0x0076, 0x0077,
    0x0078, 0x0079, 0x007A, 0x007B, 0x007C, 0x007D, 0x007E, 0x0000, 0x00C4, 0x00C5, 0x00C7, 0x00C9,
    0x00D1, 0x00D6, 0x00DC, 0x00E1, 0x00E0, 0x00E2, 0x00E4, 0x00E3, 0x00E5, 0x00E7, 0x00E9, 0x00E8,
    0x00EA, 0x00EB, 0x00ED, 0x00EC, 0x00EE, 0x00EF, 0x00F1, 0x00F3, 0x00F2, 0x00F4, 0x00F6, 0x00F5,
    0x00FA, 0x00F9, 0x00FB, 0x00FC, 0x2020, 0x00B0, 0x00A2, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x00DF,
    0x00AE, 0x00A9, 0x2122, 0x00B4, 0x00A8, 0x2260, 0x00C6, 0x00D8, 0x221E, 0x00B1, 0x2264, 0x2265,
    0x00A5, 0x00B5, 0x2202, 0x2211, 0x220F, 0x03C0, 0x222B, 0x00AA, 0x00BA, 0x03A9, 0x00E6, 0x00F8,
    0x00BF, 0x00A1, 0x00AC, 0x221A, 0x0192, 0x2248, 0x2206, 0x00AB, 0x00BB, 0x2026, 0x00A0, 0x00C0,
    0x00C3, 0x00D5, 0x0152, 0x0153, 0x2013, 0x2014, 0x201C, 0x201D, 0x2018, 0x2019, 0x00F7, 0x25CA,
    0x00FF, 0x0178, 0x2044, 0x20AC, 0x2039, 0x203A, 0xFB01, 0xFB02, 0x2021, 0x00B7, 0x201A, 0x201E,
    0x2030, 0x00C2, 0x00CA, 0x00C1, 0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF, 0x00CC, 0x00D3, 0x00D4,
    0xF8FF, 0x00D2, 0x00DA, 0x00DB, 0x00D9, 0x0131, 0x02C6, 0x02DC, 0x00AF, 0x02D8, 0x02D9, 0x02DA,
    0x00B8, 0x02DD, 0x02DB, 0x02C7,
];
