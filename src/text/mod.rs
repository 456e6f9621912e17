//! # Complex Script Text
//!
//! Turns text into glyph runs for fonts whose `GSUB` table draws character
//! sequences with single glyphs (Indic conjuncts and vowel signs).
//!
//! The pipeline:
//! 1. Split the text greedily into known composite sequences and plain runs
//!    ([`tokenizer`])
//! 2. Map composites to their substituted glyph, plain runs char by char
//! 3. Let the script's repositioner reorder the glyph run ([`reposition`])
//!
//! Only Bengali has a repositioner. Scripts are recognized from the font's
//! `GSUB` script tags and, for text, with `unicode-script`.

pub mod reposition;
pub mod tokenizer;

use unicode_script::{Script, UnicodeScript};

pub use reposition::{repositioner_for, BengaliRepositioner, GlyphRepositioner};
pub use tokenizer::{composite_order, CompositeTokenizer};

/// A script family with complex-script support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Bengali,
}

impl Language {
    /// Map an OpenType script tag to a supported language.
    pub fn from_script_tag(tag: &[u8; 4]) -> Option<Self> {
        match tag {
            b"beng" | b"bng2" => Some(Language::Bengali),
            _ => None,
        }
    }

    /// The Unicode script this language is written in.
    pub fn script(self) -> Script {
        match self {
            Language::Bengali => Script::Bengali,
        }
    }

    /// Whether any character of `text` is in this language's script.
    pub fn appears_in(self, text: &str) -> bool {
        let script = self.script();
        text.chars().any(|c| c.script() == script)
    }
}

/// The first supported language among a font's script tags.
pub fn detect_language<'a>(tags: impl IntoIterator<Item = &'a [u8; 4]>) -> Option<Language> {
    tags.into_iter().find_map(Language::from_script_tag)
}
