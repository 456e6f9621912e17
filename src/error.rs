//! Structured error types for font subsetting and glyph mapping.
//!
//! Every failure is fatal for the operation that raised it: a subsetting
//! session that returns an error has produced no output bytes.

use thiserror::Error;

/// The unified error type returned by all public forme-font API functions.
#[derive(Debug, Error)]
pub enum FontError {
    /// Wrong magic number, bad collection index, or structurally broken tables.
    #[error("invalid font format: {0}")]
    InvalidFontFormat(String),

    /// A table the operation cannot work without is absent from the directory.
    #[error("required table '{table}' is missing")]
    RequiredTableMissing { table: String },

    /// A read ran past the end of the source.
    #[error("unexpected end of data: wanted {wanted} byte(s) at offset {offset}")]
    UnexpectedEndOfData { offset: u64, wanted: usize },

    /// A composite glyph carries flag bits whose record size is unknown.
    #[error("unsupported composite encoding in glyph {glyph}: flags {flags:#06x}")]
    UnsupportedGlyphEncoding { glyph: u16, flags: u16 },

    /// A ToUnicode or predefined CMap could not be parsed.
    #[error("invalid CMap: {0}")]
    InvalidCMap(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A subsetting job failed to parse as JSON.
    #[error("failed to parse job: {source}{}", hint_suffix(.hint))]
    Job {
        source: serde_json::Error,
        hint: String,
    },
}

pub type Result<T> = std::result::Result<T, FontError>;

impl FontError {
    pub(crate) fn missing(table: &str) -> Self {
        FontError::RequiredTableMissing {
            table: table.to_string(),
        }
    }
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FontError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the job schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FontError::Job { source: e, hint }
    }
}
