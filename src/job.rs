//! # Subsetting Jobs
//!
//! A job names a font, the text a document shows with it, and how it should
//! be embedded. Jobs are JSON with camelCase keys:
//!
//! ```json
//! {
//!   "font": "fonts/NotoSans.ttc,1",
//!   "text": "Hello, world",
//!   "glyphs": [3, 4],
//!   "subset": true,
//!   "options": { "includeCmap": false, "includeExtendedTables": false }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::details::{FontDetails, FontEmbedding};
use crate::error::Result;
use crate::font::{SubsetOptions, TrueTypeFont};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsetJob {
    /// Font file path; a `,N` suffix picks a collection member.
    pub font: String,
    /// Text the document shows with this font.
    #[serde(default)]
    pub text: String,
    /// Extra glyph ids to keep, e.g. from a shaper.
    #[serde(default)]
    pub glyphs: Vec<u16>,
    /// Subset the font; when false the whole font is embedded.
    #[serde(default = "default_subset")]
    pub subset: bool,
    #[serde(default)]
    pub options: SubsetOptions,
}

fn default_subset() -> bool {
    true
}

/// What a job produced.
#[derive(Debug, Clone)]
pub struct JobOutput {
    /// The job's text as a shown string (2-byte glyph ids).
    pub content: Vec<u8>,
    pub embedding: FontEmbedding,
}

impl SubsetJob {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the font from disk and run the job.
    pub fn run(&self) -> Result<JobOutput> {
        let font = TrueTypeFont::open(&self.font)?;
        self.run_with_font(font)
    }

    /// Run the job against an already loaded font.
    pub fn run_with_font(&self, font: TrueTypeFont) -> Result<JobOutput> {
        let mut details = FontDetails::new(font)
            .with_subset(self.subset)
            .with_options(self.options);
        let content = details.convert_to_bytes(&self.text);
        details.add_glyphs(self.glyphs.iter().copied());
        let embedding = details.embed()?;
        Ok(JobOutput { content, embedding })
    }
}
