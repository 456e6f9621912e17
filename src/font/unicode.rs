//! # Unicode Fonts
//!
//! A TrueType font shown through `Identity-H`: every glyph id is its own
//! CID, so text is converted straight to glyph ids and the PDF needs a
//! `/W` array for widths and a ToUnicode CMap for text extraction.
//!
//! Fonts whose `GSUB` declares a supported complex script (Bengali) take
//! the substitution path: composite sequences become single glyphs and the
//! script's repositioner puts the run into visual order.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::text::tokenizer::Token;
use crate::text::{detect_language, repositioner_for, CompositeTokenizer, Language};

use super::{GlyphInfo, TrueTypeFont};

/// Default glyph width (`/DW`); glyphs of this width are left out of `/W`.
pub const DEFAULT_WIDTH: u32 = 1000;

/// Entries per `beginbfrange` block.
const BFRANGE_BLOCK: usize = 100;

/// A glyph a document has drawn, with what it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedGlyph {
    pub glyph: u16,
    pub width: u32,
    /// Source text; empty for glyphs placed by id.
    pub text: String,
}

/// Consecutive CIDs starting at `first` with their widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthRun {
    pub first: u16,
    pub widths: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct UnicodeFont {
    font: TrueTypeFont,
    language: Option<Language>,
    tokenizer: CompositeTokenizer,
}

impl UnicodeFont {
    pub fn new(font: TrueTypeFont) -> Self {
        let (language, tokenizer) = match font.substitutions() {
            Some(subs) => {
                let language = detect_language(subs.scripts.iter().map(|t| &t.0));
                (language, CompositeTokenizer::new(subs.composites.keys().cloned()))
            }
            None => (None, CompositeTokenizer::default()),
        };
        if let Some(language) = language {
            log::debug!("font '{}' supports {:?} glyph substitution", font.postscript_name(), language);
        }
        Self {
            font,
            language,
            tokenizer,
        }
    }

    pub fn font(&self) -> &TrueTypeFont {
        &self.font
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Whether text goes through composite substitution and repositioning.
    pub fn can_apply_substitution(&self) -> bool {
        self.language.is_some() && !self.tokenizer.is_empty()
    }

    /// The font's own glyph for one character.
    pub fn glyph_for_char(&self, c: char) -> Option<GlyphInfo> {
        let metric = self.font.char_metric(c as u32)?;
        Some(GlyphInfo {
            code: metric.glyph,
            width: metric.width,
            chars: c.to_string(),
        })
    }

    /// Convert text to glyphs. Characters the font cannot map are dropped.
    ///
    /// Substitution and repositioning only run when `text` contains a
    /// character of the font's complex script.
    pub fn text_to_glyphs(&self, text: &str) -> Vec<GlyphInfo> {
        let language = self
            .language
            .filter(|l| self.can_apply_substitution() && l.appears_in(text));
        let Some(language) = language else {
            return self.chars_to_glyphs(text);
        };
        let composites = self.font.substitutions().map(|s| &s.composites);

        let mut glyphs = Vec::new();
        for token in self.tokenizer.tokenize(text) {
            match token {
                Token::Composite(seq) => {
                    if let Some(info) = composites.and_then(|c| c.get(seq)) {
                        glyphs.push(info.clone());
                    } else {
                        glyphs.extend(self.chars_to_glyphs(seq));
                    }
                }
                Token::Plain(run) => glyphs.extend(self.chars_to_glyphs(run)),
            }
        }
        repositioner_for(language).reposition(&mut glyphs, &|c| self.glyph_for_char(c));
        glyphs
    }

    fn chars_to_glyphs(&self, text: &str) -> Vec<GlyphInfo> {
        text.chars()
            .filter_map(|c| {
                let glyph = self.glyph_for_char(c);
                if glyph.is_none() {
                    log::debug!("no glyph for U+{:04X}, dropped", c as u32);
                }
                glyph
            })
            .collect()
    }

    /// Advance of `text` in 1/1000 em.
    pub fn width_of(&self, text: &str) -> u32 {
        self.text_to_glyphs(text).iter().map(|g| g.width).sum()
    }
}

// ─── /W ─────────────────────────────────────────────────────────

/// Group used glyphs into runs of consecutive CIDs, skipping glyphs with
/// the default width.
pub fn width_runs<'a>(glyphs: impl IntoIterator<Item = &'a UsedGlyph>) -> Vec<WidthRun> {
    let mut sorted: Vec<&UsedGlyph> = glyphs.into_iter().collect();
    sorted.sort_by_key(|g| g.glyph);

    let mut runs: Vec<WidthRun> = Vec::new();
    let mut last: Option<u16> = None;
    for g in sorted {
        if g.width == DEFAULT_WIDTH || last == Some(g.glyph) {
            continue;
        }
        match runs.last_mut() {
            Some(run) if last.is_some_and(|l| l as u32 + 1 == g.glyph as u32) => {
                run.widths.push(g.width)
            }
            _ => runs.push(WidthRun {
                first: g.glyph,
                widths: vec![g.width],
            }),
        }
        last = Some(g.glyph);
    }
    runs
}

/// `/W` array text, e.g. `[3[500 600]10[250]]`, or `None` when every
/// glyph has the default width.
pub fn width_array(runs: &[WidthRun]) -> Option<String> {
    if runs.is_empty() {
        return None;
    }
    let mut out = String::from("[");
    for run in runs {
        let widths: Vec<String> = run.widths.iter().map(u32::to_string).collect();
        let _ = write!(out, "{}[{}]", run.first, widths.join(" "));
    }
    out.push(']');
    Some(out)
}

// ─── ToUnicode ──────────────────────────────────────────────────

const TO_UNICODE_HEADER: &str = "/CIDInit /ProcSet findresource begin\n\
12 dict begin\n\
begincmap\n\
/CIDSystemInfo\n\
<< /Registry (Adobe)\n\
/Ordering (UCS)\n\
/Supplement 0\n\
>> def\n\
/CMapName /Adobe-Identity-UCS def\n\
/CMapType 2 def\n\
1 begincodespacerange\n\
<0000><FFFF>\n\
endcodespacerange\n";

const TO_UNICODE_FOOTER: &str = "endcmap\n\
CMapName currentdict /CMap defineresource pop\n\
end end\n";

/// Hex destination for a bfrange entry: `<XXXX>` for the BMP, a bracketed
/// surrogate pair `[<D8XXDCXX>]` for a single supplementary character, and
/// the concatenated UTF-16 units for multi-character text.
pub fn unicode_hex(text: &str) -> String {
    let mut chars = text.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let code = c as u32;
        if code >= 0x10000 {
            let v = code - 0x10000;
            return format!("[<{:04X}{:04X}>]", 0xD800 + (v >> 10), 0xDC00 + (v & 0x3FF));
        }
    }
    let mut out = String::from("<");
    for unit in text.encode_utf16() {
        let _ = write!(out, "{:04X}", unit);
    }
    out.push('>');
    out
}

/// ToUnicode CMap for the used glyphs, in blocks of at most 100 ranges.
/// Glyphs without source text are left out; `None` when nothing remains.
pub fn to_unicode_cmap<'a>(glyphs: impl IntoIterator<Item = &'a UsedGlyph>) -> Option<String> {
    let mut mapped: Vec<&UsedGlyph> = glyphs.into_iter().filter(|g| !g.text.is_empty()).collect();
    if mapped.is_empty() {
        return None;
    }
    mapped.sort_by_key(|g| g.glyph);
    mapped.dedup_by_key(|g| g.glyph);

    let mut out = String::from(TO_UNICODE_HEADER);
    for block in mapped.chunks(BFRANGE_BLOCK) {
        let _ = writeln!(out, "{} beginbfrange", block.len());
        for g in block {
            let _ = writeln!(out, "<{:04X}><{:04X}>{}", g.glyph, g.glyph, unicode_hex(&g.text));
        }
        out.push_str("endbfrange\n");
    }
    out.push_str(TO_UNICODE_FOOTER);
    Some(out)
}

// ─── Subset prefix ──────────────────────────────────────────────

/// Six uppercase letters and `+`, derived from the retained glyph set so
/// the same subset always gets the same name.
pub fn subset_prefix(glyphs: impl IntoIterator<Item = u16>) -> String {
    // FNV-1a
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for glyph in glyphs {
        for byte in glyph.to_be_bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    let mut prefix = String::with_capacity(7);
    for _ in 0..6 {
        prefix.push((b'A' + (hash % 26) as u8) as char);
        hash /= 26;
    }
    prefix.push('+');
    prefix
}

/// Collect used glyphs keyed by glyph id, first text wins.
pub fn index_used(glyphs: impl IntoIterator<Item = UsedGlyph>) -> BTreeMap<u16, UsedGlyph> {
    let mut map = BTreeMap::new();
    for g in glyphs {
        map.entry(g.glyph).or_insert(g);
    }
    map
}
