//! # Font Metrics
//!
//! Advance widths and the descriptor-level numbers (bounding box, ascent,
//! descent, cap height, italic angle) of a font, read through
//! `ttf_parser::Face`. Everything is normalized to 1/1000 em, the unit PDF
//! glyph space uses.

use ttf_parser::{name_id, Face, GlyphId, PlatformId};

use crate::error::{FontError, Result};

/// Parse a face for the metric tables. `index` picks a collection member.
pub fn parse_face(data: &[u8], index: u32) -> Result<Face<'_>> {
    Face::parse(data, index)
        .map_err(|e| FontError::InvalidFontFormat(format!("cannot read font metrics: {}", e)))
}

/// Scale a value in font units to 1/1000 em, truncating toward zero.
pub fn to_glyph_space(value: i32, units_per_em: u16) -> i32 {
    if units_per_em == 0 {
        return value;
    }
    value * 1000 / units_per_em as i32
}

/// Advance widths in 1/1000 em, indexed by glyph id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphWidths {
    widths: Vec<u32>,
}

impl GlyphWidths {
    pub fn new(widths: Vec<u32>) -> Self {
        Self { widths }
    }

    /// One advance per glyph from `hmtx`. A glyph without a metric
    /// (no `hmtx` at all) reports 0.
    pub fn from_face(face: &Face) -> Self {
        let upem = face.units_per_em();
        let widths = (0..face.number_of_glyphs())
            .map(|g| {
                let advance = face.glyph_hor_advance(GlyphId(g)).unwrap_or(0);
                to_glyph_space(advance as i32, upem) as u32
            })
            .collect();
        Self { widths }
    }

    /// Width of `glyph`. Ids past the last glyph share its advance.
    pub fn width(&self, glyph: u16) -> u32 {
        let i = (glyph as usize).min(self.widths.len().saturating_sub(1));
        self.widths.get(i).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// Font-wide numbers for the PDF font descriptor, in 1/1000 em.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub num_glyphs: u16,
    /// xMin, yMin, xMax, yMax.
    pub bbox: [i32; 4],
    pub ascent: i32,
    pub descent: i32,
    pub cap_height: i32,
    pub italic_angle: f64,
    pub fixed_pitch: bool,
    /// `OS/2.fsSelection` bold bit.
    pub bold: bool,
}

impl FontMetrics {
    /// Ascent and descent follow `hhea` unless `OS/2` sets
    /// USE_TYPO_METRICS. Cap height falls back to the ascent when `OS/2`
    /// is missing or older than version 2.
    pub fn from_face(face: &Face) -> Self {
        let upem = face.units_per_em();
        let scale = |v: i16| to_glyph_space(v as i32, upem);
        let rect = face.global_bounding_box();
        let ascent = scale(face.ascender());

        Self {
            units_per_em: upem,
            num_glyphs: face.number_of_glyphs(),
            bbox: [rect.x_min, rect.y_min, rect.x_max, rect.y_max].map(scale),
            ascent,
            descent: scale(face.descender()),
            cap_height: face.capital_height().map(scale).unwrap_or(ascent),
            italic_angle: face.italic_angle() as f64,
            fixed_pitch: face.is_monospaced(),
            bold: face.is_bold(),
        }
    }
}

/// PostScript name (`name` id 6) with whitespace removed. Falls back to
/// the full name (id 4), then to `"Unnamed"`.
pub fn postscript_name(face: &Face) -> String {
    let find = |id: u16| {
        face.names()
            .into_iter()
            .filter(|n| n.name_id == id)
            .map(|n| {
                let text = match n.to_string() {
                    Some(text) => text,
                    // Mac Roman records; the ASCII range is all a name needs
                    None if n.platform_id == PlatformId::Macintosh => {
                        n.name.iter().map(|&b| b as char).collect()
                    }
                    None => String::new(),
                };
                text.chars().filter(|c| !c.is_whitespace()).collect::<String>()
            })
            .find(|text| !text.is_empty())
    };
    find(name_id::POST_SCRIPT_NAME)
        .or_else(|| find(name_id::FULL_NAME))
        .unwrap_or_else(|| "Unnamed".to_string())
}
