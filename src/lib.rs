//! # Forme Font
//!
//! TrueType subsetting and Unicode/CID glyph mapping for PDF font embedding.
//!
//! A document that shows text with a TrueType font usually draws a few dozen
//! of its thousands of glyphs. Forme Font keeps the glyphs actually used (and
//! every glyph their composites are built from), rewrites `loca`/`glyf` with
//! the rest emptied out, and reassembles a valid sfnt with correct
//! checksums. Glyph ids are not renumbered: the font is embedded as a
//! CIDFontType2 with `/CIDToGIDMap /Identity`, so every glyph id is its own
//! CID and the content stream bytes never need rewriting.
//!
//! Around the subsetter sits the mapping layer: text → glyph ids (with
//! `GSUB` composite substitution and glyph repositioning for complex
//! scripts), `/W` width arrays and ToUnicode CMaps on the way out, and
//! CMap-aware decoding of fonts found in existing PDFs on the way in.
//!
//! ## Architecture
//!
//! ```text
//! Input (font file + text, or a JSON job)
//!       ↓
//!   [font]      sfnt directory, metrics, cmap, GSUB, subsetting
//!       ↓
//!   [text]      composite tokenizer, script repositioning
//!       ↓
//!   [details]   per-document glyph usage → FontEmbedding
//!       ↓
//!   [pdf]       FontFile2 / FontDescriptor / CIDFont / ToUnicode / Type0
//!
//!   [cmap] + [document]  decoding text shown with an existing PDF font
//! ```

pub mod cmap;
pub mod details;
pub mod document;
pub mod error;
pub mod font;
pub mod io;
pub mod job;
pub mod pdf;
pub mod text;

use std::collections::HashSet;

pub use details::{FontDetails, FontEmbedding};
pub use document::{CodeEncoding, DocumentFont};
pub use error::{FontError, Result};
pub use font::{SubsetOptions, SubsetResult, TrueTypeFont, TrueTypeSubsetter};
pub use io::FontSource;
pub use job::SubsetJob;
pub use pdf::{write_font_objects, ObjectList, ObjectSink};

/// Subset font bytes to the given glyphs. `index` selects a collection
/// member for `.ttc` data.
///
/// This is the primary entry point for callers that track glyph ids
/// themselves. Glyph 0 and all composite components are always kept.
pub fn subset(
    font_data: &[u8],
    index: Option<u32>,
    glyphs: &HashSet<u16>,
    options: SubsetOptions,
) -> Result<SubsetResult> {
    font::subset::subset_font(font_data, index, glyphs.clone(), options)
}

/// Run a subsetting job described as JSON.
pub fn run_job_json(json: &str) -> Result<job::JobOutput> {
    SubsetJob::from_json(json)?.run()
}
