//! # cmap Subtables
//!
//! Decodes the font's character → glyph subtables into flat maps carrying
//! the glyph id and its width. Supported subtable formats: 0 (byte
//! encoding), 4 (segment mapping), 6 (trimmed table) and 12 (segmented
//! coverage).
//!
//! Encodings kept:
//! - (1, 0) Mac Roman
//! - (3, 0) Windows symbol: the font is "font specific", codes are looked
//!   up by their low byte
//! - (3, 1) Windows Unicode BMP
//! - (3, 10) Windows Unicode full repertoire (format 12 only)

use std::collections::HashMap;

use crate::error::Result;
use crate::io::FontSource;

use super::directory::TableDirectory;
use super::metrics::GlyphWidths;

/// A glyph id paired with its advance in 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetric {
    pub glyph: u16,
    pub width: u32,
}

/// Character code → glyph metric.
pub type CodeMap = HashMap<u32, GlyphMetric>;

/// The subtables of a font's `cmap` that the mapping layer uses.
#[derive(Debug, Clone, Default)]
pub struct CMaps {
    /// Mac Roman (1, 0), or the symbol subtable (3, 0) for font-specific fonts.
    pub byte_encoding: Option<CodeMap>,
    /// Windows Unicode BMP (3, 1).
    pub unicode: Option<CodeMap>,
    /// Windows Unicode full repertoire (3, 10).
    pub unicode_full: Option<CodeMap>,
    /// Set when the font carries a (3, 0) symbol subtable, or only a Mac one.
    pub font_specific: bool,
    /// `byte_encoding` is the Mac Roman (1, 0) subtable.
    pub mac_roman: bool,
}

impl CMaps {
    /// Look up a character code the way text is shown with this font.
    ///
    /// A full-repertoire subtable wins when present. Font-specific fonts
    /// accept `0x00..=0xFF` and `0xF000..=0xF0FF` by low byte.
    pub fn lookup(&self, code: u32) -> Option<GlyphMetric> {
        if let Some(full) = &self.unicode_full {
            return full.get(&code).copied();
        }
        if self.font_specific {
            let map = self.byte_encoding.as_ref()?;
            let high = code & 0xFFFF_FF00;
            if high == 0 || high == 0xF000 {
                return map.get(&(code & 0xFF)).copied();
            }
            return None;
        }
        self.unicode.as_ref()?.get(&code).copied()
    }

    /// The map used for Unicode lookups, preferring the fullest one.
    pub fn unicode_map(&self) -> Option<&CodeMap> {
        self.unicode_full.as_ref().or(self.unicode.as_ref())
    }

    /// Invert the Unicode map: glyph id → lowest code point that reaches it.
    pub fn glyph_to_unicode(&self) -> HashMap<u16, u32> {
        let mut inverse: HashMap<u16, u32> = HashMap::new();
        if let Some(map) = self.unicode_map() {
            for (&code, metric) in map {
                inverse
                    .entry(metric.glyph)
                    .and_modify(|c| *c = (*c).min(code))
                    .or_insert(code);
            }
        }
        inverse
    }
}

/// Read the `cmap` table, which must be present.
pub fn read_cmaps(
    source: &mut FontSource,
    directory: &TableDirectory,
    widths: &GlyphWidths,
) -> Result<CMaps> {
    let mut cmaps = CMaps::default();
    let table = *directory.require(b"cmap")?;
    let base = table.offset as u64;
    source.seek(base);
    source.skip(2);
    let num_tables = source.read_u16()?;

    let (mut mac_roman, mut symbol, mut unicode, mut full) = (None, None, None, None);
    for _ in 0..num_tables {
        let platform = source.read_u16()?;
        let encoding = source.read_u16()?;
        let offset = source.read_u32()? as u64;
        match (platform, encoding) {
            (1, 0) => mac_roman = Some(offset),
            (3, 0) => symbol = Some(offset),
            (3, 1) => unicode = Some(offset),
            (3, 10) => full = Some(offset),
            _ => {}
        }
    }

    if let Some(offset) = mac_roman {
        cmaps.byte_encoding = read_subtable(source, base + offset, widths, false)?;
    }
    if let Some(offset) = unicode {
        cmaps.unicode = read_subtable(source, base + offset, widths, false)?;
    }
    if let Some(offset) = symbol {
        cmaps.byte_encoding = read_subtable(source, base + offset, widths, true)?;
        cmaps.font_specific = true;
    }
    if let Some(offset) = full {
        cmaps.unicode_full = read_subtable(source, base + offset, widths, false)?;
    }
    cmaps.mac_roman = mac_roman.is_some() && symbol.is_none();
    if cmaps.unicode.is_none() && cmaps.unicode_full.is_none() && !cmaps.font_specific {
        // A Mac-only font: treat its byte encoding as the font's own.
        cmaps.font_specific = cmaps.byte_encoding.is_some();
    }
    Ok(cmaps)
}

fn read_subtable(
    source: &mut FontSource,
    offset: u64,
    widths: &GlyphWidths,
    symbol: bool,
) -> Result<Option<CodeMap>> {
    source.seek(offset);
    let format = source.read_u16()?;
    let map = match format {
        0 => read_format0(source, widths)?,
        4 => read_format4(source, widths, symbol)?,
        6 => read_format6(source, widths)?,
        12 => read_format12(source, widths)?,
        other => {
            log::warn!("cmap subtable format {} is not supported, ignored", other);
            return Ok(None);
        }
    };
    log::debug!("cmap format {}: {} codes", format, map.len());
    Ok(Some(map))
}

fn metric(widths: &GlyphWidths, glyph: u16) -> GlyphMetric {
    GlyphMetric {
        glyph,
        width: widths.width(glyph),
    }
}

fn read_format0(source: &mut FontSource, widths: &GlyphWidths) -> Result<CodeMap> {
    // length, language
    source.skip(4);
    let mut map = CodeMap::with_capacity(256);
    for code in 0..256u32 {
        let glyph = source.read_u8()? as u16;
        map.insert(code, metric(widths, glyph));
    }
    Ok(map)
}

fn read_format4(source: &mut FontSource, widths: &GlyphWidths, symbol: bool) -> Result<CodeMap> {
    let length = source.read_u16()? as usize;
    source.skip(2);
    let seg_count = source.read_u16()? as usize / 2;
    // searchRange, entrySelector, rangeShift
    source.skip(6);

    let read_array = |source: &mut FontSource| -> Result<Vec<u16>> {
        (0..seg_count).map(|_| source.read_u16()).collect()
    };
    let end_codes = read_array(source)?;
    source.skip(2);
    let start_codes = read_array(source)?;
    let id_deltas = read_array(source)?;
    let range_offsets = read_array(source)?;
    let glyph_id_count = length.saturating_sub(16 + 8 * seg_count) / 2;
    let glyph_ids: Vec<u16> = (0..glyph_id_count)
        .map(|_| source.read_u16())
        .collect::<Result<_>>()?;

    let mut map = CodeMap::new();
    for seg in 0..seg_count {
        let (start, end) = (start_codes[seg] as u32, end_codes[seg] as u32);
        if start > end {
            continue;
        }
        for code in start..=end {
            let glyph = if range_offsets[seg] == 0 {
                (code as u16).wrapping_add(id_deltas[seg])
            } else {
                let index = seg + range_offsets[seg] as usize / 2 + (code - start) as usize;
                let Some(index) = index.checked_sub(seg_count) else {
                    continue;
                };
                match glyph_ids.get(index) {
                    Some(&g) if g != 0 => g.wrapping_add(id_deltas[seg]),
                    Some(_) => 0,
                    None => continue,
                }
            };
            let m = metric(widths, glyph);
            if symbol && (code & 0xFF00) == 0xF000 {
                map.insert(code & 0xFF, m);
            }
            map.insert(code, m);
        }
    }
    Ok(map)
}

fn read_format6(source: &mut FontSource, widths: &GlyphWidths) -> Result<CodeMap> {
    source.skip(4);
    let first_code = source.read_u16()? as u32;
    let count = source.read_u16()? as u32;
    let mut map = CodeMap::with_capacity(count as usize);
    for k in 0..count {
        let glyph = source.read_u16()?;
        map.insert(first_code + k, metric(widths, glyph));
    }
    Ok(map)
}

fn read_format12(source: &mut FontSource, widths: &GlyphWidths) -> Result<CodeMap> {
    // reserved, length, language
    source.skip(10);
    let groups = source.read_u32()?;
    let mut map = CodeMap::new();
    for _ in 0..groups {
        let start = source.read_u32()?;
        let end = source.read_u32()?;
        let start_glyph = source.read_u32()?;
        if start > end || end > 0x10FFFF {
            log::warn!("cmap format 12 group {:#x}..{:#x} is invalid, ignored", start, end);
            continue;
        }
        for code in start..=end {
            let glyph = start_glyph
                .checked_add(code - start)
                .and_then(|g| u16::try_from(g).ok());
            let Some(glyph) = glyph else {
                log::warn!("cmap format 12 group at {:#x} runs past glyph 65535", start);
                break;
            };
            map.insert(code, metric(widths, glyph));
        }
    }
    Ok(map)
}
