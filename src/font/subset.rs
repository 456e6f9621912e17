//! # TrueType Font Subsetter
//!
//! Strips a TrueType font down to the glyphs a document actually draws.
//! A typical font is 50-200KB; a subset with ~100 glyphs is usually 5-15KB.
//!
//! Glyph ids are **not** renumbered. The PDF side addresses glyphs through
//! `/CIDToGIDMap /Identity`, so the subset keeps a dense `loca` covering
//! every original glyph id and simply gives dropped glyphs an empty span.
//!
//! ## Approach
//!
//! 1. Read the table directory and the full `loca` table
//! 2. Close the used glyph set over composite component references
//! 3. Copy retained glyph bytes into a new `glyf`, rebuilding `loca`
//! 4. Write a new sfnt with the selected tables, copying the rest verbatim
//!
//! A session owns its source view and output buffer. Any error aborts the
//! session before output bytes are handed back.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{FontError, Result};
use crate::io::FontSource;

use super::closure::glyph_closure;
use super::directory::{SfntFlavor, TableDirectory, TableEntry};
use super::glyf::LocaTable;
use super::sfnt::SfntWriter;

/// Which optional tables go into the subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubsetOptions {
    /// Keep the `cmap` table (needed when the font is used as a simple font).
    pub include_cmap: bool,
    /// Keep `cmap`, `OS/2` and `name` as well.
    pub include_extended_tables: bool,
}

const TABLES_SIMPLE: &[&[u8; 4]] = &[
    b"cvt ", b"fpgm", b"glyf", b"head", b"hhea", b"hmtx", b"loca", b"maxp", b"prep",
];
const TABLES_CMAP: &[&[u8; 4]] = &[
    b"cmap", b"cvt ", b"fpgm", b"glyf", b"head", b"hhea", b"hmtx", b"loca", b"maxp", b"prep",
];
const TABLES_EXTENDED: &[&[u8; 4]] = &[
    b"OS/2", b"cmap", b"cvt ", b"fpgm", b"glyf", b"head", b"hhea", b"hmtx", b"loca", b"maxp",
    b"name", b"prep",
];

impl SubsetOptions {
    /// Tables written to the subset, in tag order.
    pub fn table_names(&self) -> &'static [&'static [u8; 4]] {
        if self.include_extended_tables {
            TABLES_EXTENDED
        } else if self.include_cmap {
            TABLES_CMAP
        } else {
            TABLES_SIMPLE
        }
    }
}

/// Result of subsetting a font.
#[derive(Debug, Clone)]
pub struct SubsetResult {
    /// The subset TrueType file bytes.
    pub font_data: Vec<u8>,
    /// Glyph ids whose outlines were kept, ascending (includes glyph 0).
    pub retained_glyphs: Vec<u16>,
    /// Glyph count of the font; unchanged by subsetting.
    pub num_glyphs: usize,
}

/// Rebuilt `glyf` and `loca` bytes, un-padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenGlyphs {
    pub glyf: Vec<u8>,
    pub loca: LocaTable,
}

/// One subsetting session over one font.
pub struct TrueTypeSubsetter {
    source: FontSource,
    directory_offset: u64,
    used_glyphs: HashSet<u16>,
    options: SubsetOptions,
}

impl TrueTypeSubsetter {
    /// `directory_offset` is 0 for plain fonts; for collections use
    /// [`resolve_directory_offset`](super::directory::resolve_directory_offset).
    pub fn new(
        source: &FontSource,
        directory_offset: u64,
        used_glyphs: HashSet<u16>,
        options: SubsetOptions,
    ) -> Self {
        Self {
            source: source.create_view(),
            directory_offset,
            used_glyphs,
            options,
        }
    }

    /// Run the session and produce the subset font.
    pub fn process(mut self) -> Result<SubsetResult> {
        let directory = TableDirectory::read(&mut self.source, self.directory_offset)?;
        if directory.flavor == SfntFlavor::OpenTypeCff {
            return Err(FontError::InvalidFontFormat(
                "CFF-flavored OpenType fonts have no glyf table to subset".to_string(),
            ));
        }
        directory.require(b"head")?;
        let loca = LocaTable::read(&mut self.source, &directory)?;
        let glyf = *directory.require(b"glyf")?;

        let mut walker = self.source.create_view();
        let retained = glyph_closure(&mut walker, glyf.offset, &loca, &self.used_glyphs)?;
        let rewritten = rewrite_glyph_tables(&self.source, &glyf, &loca, &retained)?;

        let font_data = self.assemble(&directory, rewritten)?;
        log::debug!(
            "subset: {} of {} glyphs kept, {} bytes",
            retained.len(),
            loca.num_glyphs(),
            font_data.len()
        );
        Ok(SubsetResult {
            font_data,
            retained_glyphs: retained.into_iter().collect(),
            num_glyphs: loca.num_glyphs(),
        })
    }

    fn assemble(&self, directory: &TableDirectory, rewritten: RewrittenGlyphs) -> Result<Vec<u8>> {
        let mut writer = SfntWriter::new();
        let mut rewritten = Some(rewritten);
        for &tag in self.options.table_names() {
            match tag {
                b"glyf" | b"loca" => {
                    if let Some(RewrittenGlyphs { glyf, loca }) = rewritten.take() {
                        writer.add_table(*b"glyf", glyf);
                        writer.add_table(*b"loca", loca.to_bytes());
                    }
                }
                _ => match directory.get(tag) {
                    Some(entry) => {
                        let data = self
                            .source
                            .slice(entry.offset as u64, entry.length as usize)?
                            .to_vec();
                        writer.add_table_with_checksum(*tag, entry.checksum, data);
                    }
                    None => log::debug!("subset: source has no '{}' table, skipped", entry_name(tag)),
                },
            }
        }
        Ok(writer.finish())
    }
}

fn entry_name(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

/// Copy the retained glyphs into a new `glyf` and build a dense `loca`.
///
/// Every glyph id keeps its `loca` slot. Retained glyphs get their original
/// bytes at the current write cursor; all others get a zero-length span.
pub fn rewrite_glyph_tables(
    source: &FontSource,
    glyf: &TableEntry,
    loca: &LocaTable,
    retained: &BTreeSet<u16>,
) -> Result<RewrittenGlyphs> {
    let mut new_offsets = Vec::with_capacity(loca.offsets.len());
    let mut new_glyf: Vec<u8> = Vec::new();
    let mut kept = retained.iter().copied().peekable();

    for index in 0..loca.offsets.len() {
        new_offsets.push(new_glyf.len() as u32);
        if kept.peek().map(|&g| g as usize) != Some(index) {
            continue;
        }
        kept.next();
        let (start, end) = loca.span(index as u16).ok_or_else(|| {
            FontError::InvalidFontFormat(format!("retained glyph {} is outside loca", index))
        })?;
        if end < start {
            return Err(FontError::InvalidFontFormat(format!(
                "loca entries for glyph {} decrease ({} > {})",
                index, start, end
            )));
        }
        if end > glyf.length {
            return Err(FontError::InvalidFontFormat(format!(
                "glyph {} ends at {} past the glyf table ({} bytes)",
                index, end, glyf.length
            )));
        }
        let bytes = source.slice(glyf.offset as u64 + start as u64, (end - start) as usize)?;
        new_glyf.extend_from_slice(bytes);
    }

    Ok(RewrittenGlyphs {
        glyf: new_glyf,
        loca: LocaTable {
            format: loca.format,
            offsets: new_offsets,
        },
    })
}

/// Subset an in-memory font (plain or collection member).
pub fn subset_font(
    font_data: &[u8],
    collection_index: Option<u32>,
    used_glyphs: HashSet<u16>,
    options: SubsetOptions,
) -> Result<SubsetResult> {
    let mut source = FontSource::from_bytes(font_data.to_vec());
    let offset = super::directory::resolve_directory_offset(&mut source, collection_index)?;
    TrueTypeSubsetter::new(&source, offset, used_glyphs, options).process()
}
