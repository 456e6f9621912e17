//! # loca / glyf Access
//!
//! `loca` is read fully into memory: subsetting needs random access to any
//! glyph's byte span in `glyf`. Glyph bodies stay in the source and are only
//! inspected for composite component records.

use crate::error::{FontError, Result};
use crate::io::FontSource;

use super::directory::TableDirectory;

/// Byte offset within `head` holding the low byte of `indexToLocFormat`.
pub const HEAD_LOCA_FORMAT_OFFSET: u64 = 51;

// Composite glyph flags
pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
pub const ROUND_XY_TO_GRID: u16 = 0x0004;
pub const WE_HAVE_A_SCALE: u16 = 0x0008;
pub const MORE_COMPONENTS: u16 = 0x0020;
pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
pub const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;
pub const USE_MY_METRICS: u16 = 0x0200;
pub const OVERLAP_COMPOUND: u16 = 0x0400;
pub const SCALED_COMPONENT_OFFSET: u16 = 0x0800;
pub const UNSCALED_COMPONENT_OFFSET: u16 = 0x1000;

const KNOWN_COMPONENT_FLAGS: u16 = ARG_1_AND_2_ARE_WORDS
    | ARGS_ARE_XY_VALUES
    | ROUND_XY_TO_GRID
    | WE_HAVE_A_SCALE
    | MORE_COMPONENTS
    | WE_HAVE_AN_X_AND_Y_SCALE
    | WE_HAVE_A_TWO_BY_TWO
    | WE_HAVE_INSTRUCTIONS
    | USE_MY_METRICS
    | OVERLAP_COMPOUND
    | SCALED_COMPONENT_OFFSET
    | UNSCALED_COMPONENT_OFFSET;
const TRANSFORM_FLAGS: u16 = WE_HAVE_A_SCALE | WE_HAVE_AN_X_AND_Y_SCALE | WE_HAVE_A_TWO_BY_TWO;

/// Encoding of `loca` entries, selected by `head.indexToLocFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    /// u16 entries holding the offset divided by two.
    Short,
    /// u32 entries holding the offset.
    Long,
}

impl LocaFormat {
    pub fn entry_size(self) -> usize {
        match self {
            LocaFormat::Short => 2,
            LocaFormat::Long => 4,
        }
    }

    /// Read the format flag from the `head` table.
    pub fn from_head(source: &mut FontSource, directory: &TableDirectory) -> Result<Self> {
        let head = directory.require(b"head")?;
        source.seek(head.offset as u64 + HEAD_LOCA_FORMAT_OFFSET);
        Ok(if source.read_u8()? == 0 {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        })
    }
}

/// Per-glyph byte offsets into `glyf`. Entry `i` and `i + 1` delimit glyph `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaTable {
    pub format: LocaFormat,
    /// Actual byte offsets (short entries already doubled).
    pub offsets: Vec<u32>,
}

impl LocaTable {
    /// Read the whole `loca` table of the font.
    pub fn read(source: &mut FontSource, directory: &TableDirectory) -> Result<Self> {
        let format = LocaFormat::from_head(source, directory)?;
        let loca = directory.require(b"loca")?;
        source.seek(loca.offset as u64);

        let count = loca.length as usize / format.entry_size();
        let mut offsets = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = match format {
                LocaFormat::Short => source.read_u16()? as u32 * 2,
                LocaFormat::Long => source.read_u32()?,
            };
            offsets.push(offset);
        }
        log::debug!("loca: {:?} format, {} entries", format, offsets.len());
        Ok(Self { format, offsets })
    }

    /// Number of glyphs described (entries minus the trailing end marker).
    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Byte range of `glyph` within `glyf`, or `None` past the table.
    pub fn span(&self, glyph: u16) -> Option<(u32, u32)> {
        let i = glyph as usize;
        let start = *self.offsets.get(i)?;
        let end = *self.offsets.get(i + 1)?;
        Some((start, end))
    }

    /// Serialize in this table's format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.offsets.len() * self.format.entry_size());
        for &offset in &self.offsets {
            match self.format {
                LocaFormat::Short => data.extend_from_slice(&((offset / 2) as u16).to_be_bytes()),
                LocaFormat::Long => data.extend_from_slice(&offset.to_be_bytes()),
            }
        }
        data
    }
}

/// One record of a composite glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub flags: u16,
    pub glyph: u16,
}

impl Component {
    /// Bytes of arguments and transform that follow `flags` and `glyphIndex`.
    fn trailing_len(self) -> usize {
        let args = if self.flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        let transform = if self.flags & WE_HAVE_A_SCALE != 0 {
            2
        } else if self.flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            4
        } else if self.flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            8
        } else {
            0
        };
        args + transform
    }
}

/// What a glyph's `glyf` entry contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Glyph {
    /// Zero-length span: no outline at all.
    Empty,
    /// Contour data; no dependencies.
    Simple { contours: i16 },
    /// References to other glyphs.
    Composite { components: Vec<Component> },
}

/// Read the glyph at `glyph` through `loca`, decoding composite records.
pub fn read_glyph(
    source: &mut FontSource,
    glyf_offset: u32,
    loca: &LocaTable,
    glyph: u16,
) -> Result<Glyph> {
    let (start, end) = loca.span(glyph).ok_or_else(|| {
        FontError::InvalidFontFormat(format!(
            "glyph {} is outside loca ({} glyphs)",
            glyph,
            loca.num_glyphs()
        ))
    })?;
    if start == end {
        return Ok(Glyph::Empty);
    }
    if end < start {
        return Err(FontError::InvalidFontFormat(format!(
            "loca entries for glyph {} decrease ({} > {})",
            glyph, start, end
        )));
    }

    source.seek(glyf_offset as u64 + start as u64);
    let contours = source.read_i16()?;
    if contours >= 0 {
        return Ok(Glyph::Simple { contours });
    }

    // xMin, yMin, xMax, yMax
    source.skip(8);
    let mut components = Vec::new();
    loop {
        let flags = source.read_u16()?;
        let component_glyph = source.read_u16()?;
        if flags & !KNOWN_COMPONENT_FLAGS != 0 || (flags & TRANSFORM_FLAGS).count_ones() > 1 {
            return Err(FontError::UnsupportedGlyphEncoding { glyph, flags });
        }
        let component = Component {
            flags,
            glyph: component_glyph,
        };
        source.skip(component.trailing_len() as u64);
        components.push(component);
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    Ok(Glyph::Composite { components })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testfont::{composite_glyph, simple_glyph, TestFont};

    #[test]
    fn test_short_loca_is_doubled() {
        let font = TestFont::new()
            .short_loca()
            .glyph(vec![])
            .glyph(vec![0u8; 1000])
            .build();
        let mut src = FontSource::from_bytes(font);
        let dir = TableDirectory::read(&mut src, 0).unwrap();
        let loca = LocaTable::read(&mut src, &dir).unwrap();
        assert_eq!(loca.format, LocaFormat::Short);
        assert_eq!(loca.offsets, vec![0, 0, 1000]);
        // Raw short value on disk is 500
        assert_eq!(&loca.to_bytes()[4..6], &500u16.to_be_bytes());
    }

    #[test]
    fn test_long_loca() {
        let font = TestFont::new().glyph(simple_glyph(1)).glyph(vec![]).build();
        let mut src = FontSource::from_bytes(font);
        let dir = TableDirectory::read(&mut src, 0).unwrap();
        let loca = LocaTable::read(&mut src, &dir).unwrap();
        assert_eq!(loca.format, LocaFormat::Long);
        assert_eq!(loca.num_glyphs(), 2);
        assert_eq!(loca.span(1), Some((loca.offsets[1], loca.offsets[1])));
        assert_eq!(loca.span(2), None);
    }

    #[test]
    fn test_missing_loca() {
        let font = TestFont::new().glyph(vec![]).without_table(*b"loca").build();
        let mut src = FontSource::from_bytes(font);
        let dir = TableDirectory::read(&mut src, 0).unwrap();
        assert!(matches!(
            LocaTable::read(&mut src, &dir),
            Err(FontError::RequiredTableMissing { .. })
        ));
    }

    #[test]
    fn test_read_composite_components() {
        let font = TestFont::new()
            .glyph(vec![])
            .glyph(simple_glyph(2))
            .glyph(composite_glyph(&[(1, ARG_1_AND_2_ARE_WORDS | WE_HAVE_A_SCALE), (0, WE_HAVE_A_TWO_BY_TWO)]))
            .build();
        let mut src = FontSource::from_bytes(font);
        let dir = TableDirectory::read(&mut src, 0).unwrap();
        let loca = LocaTable::read(&mut src, &dir).unwrap();
        let glyf = dir.get(b"glyf").unwrap().offset;

        assert_eq!(read_glyph(&mut src, glyf, &loca, 0).unwrap(), Glyph::Empty);
        assert_eq!(read_glyph(&mut src, glyf, &loca, 1).unwrap(), Glyph::Simple { contours: 2 });
        match read_glyph(&mut src, glyf, &loca, 2).unwrap() {
            Glyph::Composite { components } => {
                let gids: Vec<u16> = components.iter().map(|c| c.glyph).collect();
                assert_eq!(gids, vec![1, 0]);
            }
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn test_reserved_component_flag_is_unsupported() {
        let font = TestFont::new()
            .glyph(simple_glyph(1))
            .glyph(composite_glyph(&[(0, 0x4000)]))
            .build();
        let mut src = FontSource::from_bytes(font);
        let dir = TableDirectory::read(&mut src, 0).unwrap();
        let loca = LocaTable::read(&mut src, &dir).unwrap();
        let glyf = dir.get(b"glyf").unwrap().offset;
        assert!(matches!(
            read_glyph(&mut src, glyf, &loca, 1),
            Err(FontError::UnsupportedGlyphEncoding { glyph: 1, flags: 0x4000 })
        ));
    }

    #[test]
    fn test_conflicting_transform_flags_are_unsupported() {
        let flags = WE_HAVE_A_SCALE | WE_HAVE_A_TWO_BY_TWO;
        let font = TestFont::new()
            .glyph(simple_glyph(1))
            .glyph(composite_glyph(&[(0, flags)]))
            .build();
        let mut src = FontSource::from_bytes(font);
        let dir = TableDirectory::read(&mut src, 0).unwrap();
        let loca = LocaTable::read(&mut src, &dir).unwrap();
        let glyf = dir.get(b"glyf").unwrap().offset;
        assert!(read_glyph(&mut src, glyf, &loca, 1).is_err());
    }
}
