//! # Font Management
//!
//! Loading TrueType fonts for PDF embedding: the table directory, metrics,
//! character maps and glyph substitutions of one font, plus the subsetting
//! session that strips it down to the glyphs a document draws.
//!
//! Metrics and names come from `ttf_parser::Face`. The table directory,
//! `loca`/`glyf`, `cmap` and `GSUB` go through the crate's own readers:
//! subsetting needs byte-exact access to glyph spans, and the mapping layer
//! needs the raw `cmap` subtables.

pub mod closure;
pub mod cmap;
pub mod directory;
pub mod glyf;
pub mod gsub;
pub mod metrics;
pub mod sfnt;
pub mod subset;
pub mod unicode;

#[cfg(test)]
pub(crate) mod testfont;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::io::FontSource;

pub use cmap::{CMaps, GlyphMetric};
pub use directory::{split_collection_suffix, TableDirectory, Tag};
pub use gsub::{GlyphInfo, GlyphSubstitutions};
pub use metrics::{FontMetrics, GlyphWidths};
pub use subset::{SubsetOptions, SubsetResult, TrueTypeSubsetter};

/// A parsed TrueType font: everything the mapping layer and the PDF writer
/// need, plus the source for subsetting.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    source: FontSource,
    directory_offset: u64,
    collection: bool,
    directory: TableDirectory,
    metrics: FontMetrics,
    widths: GlyphWidths,
    cmaps: CMaps,
    substitutions: Option<GlyphSubstitutions>,
    postscript_name: String,
}

impl TrueTypeFont {
    /// Open a font file. A `.ttc,N` suffix selects a collection member.
    pub fn open(name: &str) -> Result<Self> {
        let (path, index) = split_collection_suffix(name);
        let source = FontSource::open(Path::new(path))?;
        Self::from_source(source, index)
    }

    pub fn from_bytes(data: impl Into<Arc<[u8]>>, index: Option<u32>) -> Result<Self> {
        Self::from_source(FontSource::from_bytes(data), index)
    }

    /// Parse `head`, `hhea`, `hmtx`, `maxp` and `cmap` (all required) and
    /// the optional `OS/2`, `post`, `name` and `GSUB` tables.
    pub fn from_source(mut source: FontSource, index: Option<u32>) -> Result<Self> {
        let collection = directory::is_collection(&mut source)?;
        let directory_offset = directory::resolve_directory_offset(&mut source, index)?;
        let directory = TableDirectory::read(&mut source, directory_offset)?;
        for tag in [b"head", b"hhea", b"hmtx", b"maxp", b"cmap"] {
            directory.require(tag)?;
        }

        let (metrics, widths, postscript_name) = {
            let data = source.clone();
            let bytes = data.slice(0, data.length() as usize)?;
            let face = metrics::parse_face(bytes, index.unwrap_or(0))?;
            (
                FontMetrics::from_face(&face),
                GlyphWidths::from_face(&face),
                metrics::postscript_name(&face),
            )
        };
        let cmaps = cmap::read_cmaps(&mut source, &directory, &widths)?;
        let substitutions =
            gsub::read_substitutions(&mut source, &directory, &cmaps.glyph_to_unicode(), &widths)?;

        log::debug!(
            "loaded font '{}': {} tables, {} glyphs, {} em units",
            postscript_name,
            directory.len(),
            metrics.num_glyphs,
            metrics.units_per_em
        );
        Ok(Self {
            source,
            directory_offset,
            collection,
            directory,
            metrics,
            widths,
            cmaps,
            substitutions,
            postscript_name,
        })
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn cmaps(&self) -> &CMaps {
        &self.cmaps
    }

    pub fn substitutions(&self) -> Option<&GlyphSubstitutions> {
        self.substitutions.as_ref()
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    /// Glyph and width for a character code, per the font's cmaps.
    pub fn char_metric(&self, code: u32) -> Option<GlyphMetric> {
        self.cmaps.lookup(code)
    }

    /// Advance of `glyph` in 1/1000 em.
    pub fn glyph_width(&self, glyph: u16) -> u32 {
        self.widths.width(glyph)
    }

    pub fn is_font_specific(&self) -> bool {
        self.cmaps.font_specific
    }

    /// Run a subsetting session over this font's source.
    pub fn subset(&self, used_glyphs: HashSet<u16>, options: SubsetOptions) -> Result<SubsetResult> {
        TrueTypeSubsetter::new(&self.source, self.directory_offset, used_glyphs, options).process()
    }

    /// Bytes to embed when subsetting is off: the file itself, or for a
    /// collection member a standalone font carrying every glyph.
    pub fn full_font_data(&self) -> Result<Vec<u8>> {
        if !self.collection {
            return Ok(self.source.slice(0, self.source.length() as usize)?.to_vec());
        }
        let all: HashSet<u16> = (0..self.metrics.num_glyphs).collect();
        let options = SubsetOptions {
            include_cmap: true,
            include_extended_tables: true,
        };
        Ok(self.subset(all, options)?.font_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FontError;
    use crate::font::testfont::{name_table, simple_glyph, TestFont};

    fn sample() -> TestFont {
        TestFont::new()
            .glyph(vec![])
            .glyph(simple_glyph(1))
            .glyph(simple_glyph(2))
            .advances(&[0, 278, 556])
            .unicode_cmap(&[(0x20, 1), (0x41, 2)])
    }

    #[test]
    fn test_load_font() {
        let font = TrueTypeFont::from_bytes(sample().postscript_name("Forme Sans").build(), None).unwrap();
        assert_eq!(font.postscript_name(), "FormeSans");
        assert_eq!(font.metrics().num_glyphs, 3);
        assert_eq!(font.char_metric(0x41), Some(GlyphMetric { glyph: 2, width: 556 }));
        assert_eq!(font.glyph_width(1), 278);
        assert!(font.substitutions().is_none());
        assert!(!font.is_font_specific());
    }

    #[test]
    fn test_missing_hhea_is_required() {
        let data = sample().without_table(*b"hhea").build();
        assert!(matches!(
            TrueTypeFont::from_bytes(data, None),
            Err(FontError::RequiredTableMissing { table }) if table == "hhea"
        ));
    }

    #[test]
    fn test_missing_cmap_is_required() {
        let data = sample().without_table(*b"cmap").build();
        assert!(matches!(
            TrueTypeFont::from_bytes(data, None),
            Err(FontError::RequiredTableMissing { table }) if table == "cmap"
        ));
    }

    #[test]
    fn test_name_falls_back_to_full_name() {
        let full: Vec<u8> = "Forme Serif".encode_utf16().flat_map(|c| c.to_be_bytes()).collect();
        let data = sample().table(*b"name", name_table(&[(3, 1, 0x409, 4, full)])).build();
        let font = TrueTypeFont::from_bytes(data, None).unwrap();
        assert_eq!(font.postscript_name(), "FormeSerif");
    }

    #[test]
    fn test_mac_name_record() {
        let data = sample()
            .table(*b"name", name_table(&[(1, 0, 0, 6, b"MacName".to_vec())]))
            .build();
        let font = TrueTypeFont::from_bytes(data, None).unwrap();
        assert_eq!(font.postscript_name(), "MacName");
    }

    #[test]
    fn test_unnamed_font() {
        let font = TrueTypeFont::from_bytes(sample().build(), None).unwrap();
        assert_eq!(font.postscript_name(), "Unnamed");
    }

    #[test]
    fn test_full_font_data_of_plain_font_is_the_file() {
        let data = sample().build();
        let font = TrueTypeFont::from_bytes(data.clone(), None).unwrap();
        assert_eq!(font.full_font_data().unwrap(), data);
    }
}
