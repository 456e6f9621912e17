//! Script-specific glyph reordering.
//!
//! Some dependent vowel signs are typed after the consonant they attach to
//! but drawn before it. Fonts without a full shaping engine rely on the
//! writer to move those glyphs into visual order.

use crate::font::GlyphInfo;

use super::Language;

/// Finds the glyph for a single character (substituted form first, then cmap).
pub type GlyphLookup<'a> = dyn Fn(char) -> Option<GlyphInfo> + 'a;

/// Reorders a glyph run from logical into visual order.
pub trait GlyphRepositioner: Send + Sync {
    fn reposition(&self, glyphs: &mut Vec<GlyphInfo>, lookup: &GlyphLookup<'_>);
}

/// The repositioner for `language`.
pub fn repositioner_for(language: Language) -> &'static dyn GlyphRepositioner {
    match language {
        Language::Bengali => &BengaliRepositioner,
    }
}

/// Move every glyph whose characters are in `left_shifted` one place left,
/// in front of the glyph it follows.
fn shift_left(glyphs: &mut [GlyphInfo], left_shifted: &[&str]) {
    let mut i = 0;
    while i + 1 < glyphs.len() {
        if left_shifted.contains(&glyphs[i + 1].chars.as_str()) {
            glyphs.swap(i, i + 1);
            i += 2;
        } else {
            i += 1;
        }
    }
}

// ─── Bengali ────────────────────────────────────────────────────

const BENGALI_LEFT_SHIFTED: &[&str] = &["\u{09BF}", "\u{09C7}", "\u{09C8}"];

/// Bengali: two-part vowels (O and AU kaar) are split into their halves,
/// then the pre-base vowel signs (I, E, AI kaar) move before their consonant.
#[derive(Debug, Clone, Copy, Default)]
pub struct BengaliRepositioner;

impl BengaliRepositioner {
    fn split_vowel(sign: &str) -> Option<(char, char)> {
        match sign {
            "\u{09CB}" => Some(('\u{09C7}', '\u{09BE}')),
            "\u{09CC}" => Some(('\u{09C7}', '\u{09D7}')),
            _ => None,
        }
    }
}

impl GlyphRepositioner for BengaliRepositioner {
    fn reposition(&self, glyphs: &mut Vec<GlyphInfo>, lookup: &GlyphLookup<'_>) {
        let mut i = 0;
        while i < glyphs.len() {
            if let Some((first, second)) = Self::split_vowel(&glyphs[i].chars) {
                match (lookup(first), lookup(second)) {
                    (Some(a), Some(b)) => {
                        glyphs[i] = a;
                        glyphs.insert(i + 1, b);
                        i += 1;
                    }
                    _ => log::warn!(
                        "font has no glyphs for the halves of {:?}, left unsplit",
                        glyphs[i].chars
                    ),
                }
            }
            i += 1;
        }
        shift_left(glyphs, BENGALI_LEFT_SHIFTED);
    }
}
