//! # sfnt Table Directory
//!
//! Reads the offset table at the start of a TrueType/OpenType font (or at a
//! sub-font offset inside a `ttcf` collection) into a tag → entry map.

use std::collections::HashMap;
use std::fmt;

use crate::error::{FontError, Result};
use crate::io::FontSource;

/// sfnt version of a TrueType-outline font.
pub const TRUETYPE_VERSION: u32 = 0x0001_0000;
/// sfnt version of a CFF-outline OpenType font (`OTTO`).
pub const OPENTYPE_CFF_VERSION: u32 = 0x4F54_544F;
const COLLECTION_TAG: [u8; 4] = *b"ttcf";

/// A 4-byte table tag such as `glyf` or `OS/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const fn new(tag: &[u8; 4]) -> Self {
        Tag(*tag)
    }

    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// One row of the table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// Outline flavor announced by the sfnt version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfntFlavor {
    TrueType,
    /// CFF outlines. Recognized here; not subset by glyf rewriting.
    OpenTypeCff,
}

/// The parsed table directory of one font.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    pub flavor: SfntFlavor,
    /// Offset of the directory itself within the source (non-zero inside collections).
    pub directory_offset: u64,
    tables: HashMap<Tag, TableEntry>,
}

impl TableDirectory {
    /// Read the directory at `directory_offset`.
    pub fn read(source: &mut FontSource, directory_offset: u64) -> Result<Self> {
        source.seek(directory_offset);
        let version = source.read_u32()?;
        let flavor = match version {
            TRUETYPE_VERSION => SfntFlavor::TrueType,
            OPENTYPE_CFF_VERSION => SfntFlavor::OpenTypeCff,
            other => {
                return Err(FontError::InvalidFontFormat(format!(
                    "not a TrueType or OpenType font (version {:#010x})",
                    other
                )))
            }
        };

        let num_tables = source.read_u16()?;
        // searchRange, entrySelector, rangeShift
        source.skip(6);

        let mut tables = HashMap::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = Tag(source.read_tag()?);
            let checksum = source.read_u32()?;
            let offset = source.read_u32()?;
            let length = source.read_u32()?;
            // Duplicate tags should not occur; the last one wins.
            tables.insert(tag, TableEntry { tag, checksum, offset, length });
        }

        log::debug!("table directory at {}: {} tables", directory_offset, tables.len());
        Ok(Self {
            flavor,
            directory_offset,
            tables,
        })
    }

    pub fn get(&self, tag: &[u8; 4]) -> Option<&TableEntry> {
        self.tables.get(&Tag(*tag))
    }

    /// Look up a table the caller cannot proceed without.
    pub fn require(&self, tag: &[u8; 4]) -> Result<&TableEntry> {
        self.get(tag)
            .ok_or_else(|| FontError::missing(&Tag(*tag).to_string()))
    }

    pub fn contains(&self, tag: &[u8; 4]) -> bool {
        self.tables.contains_key(&Tag(*tag))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// All entries, sorted by tag.
    pub fn entries(&self) -> Vec<TableEntry> {
        let mut entries: Vec<TableEntry> = self.tables.values().copied().collect();
        entries.sort_by_key(|e| e.tag);
        entries
    }
}

// ─── Collections ────────────────────────────────────────────────

/// Split a `path.ttc,N` font name into the path and sub-font index.
///
/// Names without a numeric suffix return `None` for the index.
pub fn split_collection_suffix(name: &str) -> (&str, Option<u32>) {
    if let Some(comma) = name.rfind(',') {
        let (path, suffix) = (&name[..comma], &name[comma + 1..]);
        if let Ok(index) = suffix.trim().parse::<u32>() {
            if path.to_ascii_lowercase().ends_with(".ttc") {
                return (path, Some(index));
            }
        }
    }
    (name, None)
}

/// Resolve the directory offset of a font inside the source.
///
/// Plain fonts live at offset 0 and accept only index 0 (or none). A `ttcf`
/// collection is searched for sub-font `index`.
pub fn resolve_directory_offset(source: &mut FontSource, index: Option<u32>) -> Result<u64> {
    source.seek(0);
    let tag = source.read_tag()?;
    if tag != COLLECTION_TAG {
        return match index {
            None | Some(0) => Ok(0),
            Some(i) => Err(FontError::InvalidFontFormat(format!(
                "font index {} requested from a font that is not a collection",
                i
            ))),
        };
    }

    // majorVersion, minorVersion
    source.skip(4);
    let num_fonts = source.read_u32()?;
    let index = index.unwrap_or(0);
    if index >= num_fonts {
        return Err(FontError::InvalidFontFormat(format!(
            "collection has {} fonts, index {} is out of range",
            num_fonts, index
        )));
    }
    source.skip(index as u64 * 4);
    Ok(source.read_u32()? as u64)
}

/// Whether the source starts with a `ttcf` collection header.
pub fn is_collection(source: &mut FontSource) -> Result<bool> {
    source.seek(0);
    Ok(source.read_tag()? == COLLECTION_TAG)
}

/// Number of fonts in the source: the `ttcf` count, or 1 for a plain font.
pub fn collection_size(source: &mut FontSource) -> Result<u32> {
    source.seek(0);
    if source.read_tag()? != COLLECTION_TAG {
        return Ok(1);
    }
    source.skip(4);
    source.read_u32()
}
