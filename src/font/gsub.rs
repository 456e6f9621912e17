//! # GSUB Composites
//!
//! Reads the OpenType glyph substitution table far enough to learn which
//! multi-character sequences the font draws with a single glyph.
//!
//! Lookups of type 1 (single substitution) and 4 (ligature substitution) are
//! collected, type 7 (extension) is unwrapped to either of them; all other
//! lookup types are skipped. Every rule's components are traced back
//! through the substitutions to the characters that produce them, so a
//! ligature of substituted forms still resolves to its source text and two
//! sequences drawn with the same glyph are both reported. Only sequences of
//! two or more characters are reported: single-character substitutions are
//! stylistic and never picked by text tokenization.

use std::collections::HashMap;

use crate::error::Result;
use crate::io::FontSource;

use super::directory::{TableDirectory, Tag};
use super::metrics::GlyphWidths;

/// Substitution chains longer than this are treated as unresolvable.
const MAX_SUBSTITUTION_DEPTH: usize = 16;

/// A glyph that draws a whole character sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphInfo {
    pub code: u16,
    /// Advance in 1/1000 em.
    pub width: u32,
    /// The characters this glyph stands for.
    pub chars: String,
}

/// What the font's `GSUB` table offers to text conversion.
#[derive(Debug, Clone, Default)]
pub struct GlyphSubstitutions {
    /// Script tags from the script list, in table order.
    pub scripts: Vec<Tag>,
    /// Character sequence (2+ chars) → substituted glyph.
    pub composites: HashMap<String, GlyphInfo>,
}

impl GlyphSubstitutions {
    pub fn supports_script(&self, tag: &[u8; 4]) -> bool {
        self.scripts.iter().any(|t| &t.0 == tag)
    }
}

/// One raw rule: `glyph` replaces the sequence `components`.
#[derive(Debug, Clone)]
struct Rule {
    glyph: u16,
    components: Vec<u16>,
}

/// Read `GSUB`, or `None` when the font has no such table.
///
/// `glyph_to_unicode` is the inverted Unicode cmap: it anchors the trace
/// from substituted glyphs back to characters.
pub fn read_substitutions(
    source: &mut FontSource,
    directory: &TableDirectory,
    glyph_to_unicode: &HashMap<u16, u32>,
    widths: &GlyphWidths,
) -> Result<Option<GlyphSubstitutions>> {
    let Some(gsub) = directory.get(b"GSUB").copied() else {
        return Ok(None);
    };
    let base = gsub.offset as u64;
    source.seek(base + 4);
    let script_list = source.read_u16()? as u64;
    source.skip(2);
    let lookup_list = source.read_u16()? as u64;

    let scripts = read_script_tags(source, base + script_list)?;
    let rules = read_lookup_list(source, base + lookup_list)?;

    let mut producers: HashMap<u16, &[u16]> = HashMap::new();
    for rule in &rules {
        producers.entry(rule.glyph).or_insert(rule.components.as_slice());
    }

    let mut composites = HashMap::new();
    for rule in &rules {
        let chars: Option<String> = rule
            .components
            .iter()
            .map(|&c| trace_text(c, glyph_to_unicode, &producers, 0))
            .collect();
        let Some(chars) = chars else {
            log::debug!("GSUB glyph {} has no character source, skipped", rule.glyph);
            continue;
        };
        if chars.chars().count() < 2 {
            continue;
        }
        composites.entry(chars.clone()).or_insert(GlyphInfo {
            code: rule.glyph,
            width: widths.width(rule.glyph),
            chars,
        });
    }
    log::debug!(
        "GSUB: {} scripts, {} rules, {} composites",
        scripts.len(),
        rules.len(),
        composites.len()
    );
    Ok(Some(GlyphSubstitutions { scripts, composites }))
}

/// Characters drawn by `glyph`: its cmap character, or the concatenated
/// text of the components the first rule producing it replaces.
fn trace_text(
    glyph: u16,
    glyph_to_unicode: &HashMap<u16, u32>,
    producers: &HashMap<u16, &[u16]>,
    depth: usize,
) -> Option<String> {
    if let Some(&code) = glyph_to_unicode.get(&glyph) {
        return char::from_u32(code).map(String::from);
    }
    if depth >= MAX_SUBSTITUTION_DEPTH {
        return None;
    }
    let components = producers.get(&glyph)?;
    let mut text = String::new();
    for &component in components.iter() {
        text.push_str(&trace_text(component, glyph_to_unicode, producers, depth + 1)?);
    }
    Some(text)
}

fn read_script_tags(source: &mut FontSource, offset: u64) -> Result<Vec<Tag>> {
    source.seek(offset);
    let count = source.read_u16()?;
    let mut tags = Vec::with_capacity(count as usize);
    for _ in 0..count {
        tags.push(Tag(source.read_tag()?));
        source.skip(2);
    }
    Ok(tags)
}

fn read_offsets16(source: &mut FontSource, base: u64) -> Result<Vec<u64>> {
    let count = source.read_u16()?;
    (0..count)
        .map(|_| Ok(base + source.read_u16()? as u64))
        .collect()
}

fn read_lookup_list(source: &mut FontSource, offset: u64) -> Result<Vec<Rule>> {
    source.seek(offset);
    let lookups = read_offsets16(source, offset)?;
    let mut rules = Vec::new();
    for lookup in lookups {
        source.seek(lookup);
        let lookup_type = source.read_u16()?;
        source.skip(2);
        let subtables = read_offsets16(source, lookup)?;
        for subtable in subtables {
            read_subtable(source, lookup_type, subtable, &mut rules)?;
        }
    }
    Ok(rules)
}

fn read_subtable(
    source: &mut FontSource,
    lookup_type: u16,
    offset: u64,
    rules: &mut Vec<Rule>,
) -> Result<()> {
    match lookup_type {
        1 => read_single(source, offset, rules),
        4 => read_ligatures(source, offset, rules),
        7 => {
            source.seek(offset + 2);
            let extended_type = source.read_u16()?;
            let extension = source.read_u32()? as u64;
            if extended_type == 7 {
                log::warn!("GSUB extension lookup wraps another extension, skipped");
                return Ok(());
            }
            read_subtable(source, extended_type, offset + extension, rules)
        }
        other => {
            log::debug!("GSUB lookup type {} is not used, skipped", other);
            Ok(())
        }
    }
}

fn read_single(source: &mut FontSource, offset: u64, rules: &mut Vec<Rule>) -> Result<()> {
    source.seek(offset);
    let format = source.read_u16()?;
    let coverage = offset + source.read_u16()? as u64;
    match format {
        1 => {
            let delta = source.read_i16()?;
            for glyph in read_coverage(source, coverage)? {
                rules.push(Rule {
                    glyph: glyph.wrapping_add(delta as u16),
                    components: vec![glyph],
                });
            }
        }
        2 => {
            let count = source.read_u16()?;
            let substitutes: Vec<u16> = (0..count).map(|_| source.read_u16()).collect::<Result<_>>()?;
            for (glyph, substitute) in read_coverage(source, coverage)?.into_iter().zip(substitutes) {
                rules.push(Rule {
                    glyph: substitute,
                    components: vec![glyph],
                });
            }
        }
        other => log::warn!("GSUB single substitution format {} is unknown, skipped", other),
    }
    Ok(())
}

fn read_ligatures(source: &mut FontSource, offset: u64, rules: &mut Vec<Rule>) -> Result<()> {
    source.seek(offset);
    let format = source.read_u16()?;
    if format != 1 {
        log::warn!("GSUB ligature substitution format {} is unknown, skipped", format);
        return Ok(());
    }
    let coverage = offset + source.read_u16()? as u64;
    let sets = read_offsets16(source, offset)?;
    let firsts = read_coverage(source, coverage)?;

    for (first, set) in firsts.into_iter().zip(sets) {
        source.seek(set);
        let ligatures = read_offsets16(source, set)?;
        for ligature in ligatures {
            source.seek(ligature);
            let glyph = source.read_u16()?;
            let count = source.read_u16()?;
            let mut components = Vec::with_capacity(count as usize);
            components.push(first);
            for _ in 1..count {
                components.push(source.read_u16()?);
            }
            rules.push(Rule { glyph, components });
        }
    }
    Ok(())
}

/// Glyphs of a coverage table, in coverage-index order.
fn read_coverage(source: &mut FontSource, offset: u64) -> Result<Vec<u16>> {
    source.seek(offset);
    let format = source.read_u16()?;
    let count = source.read_u16()?;
    let mut glyphs = Vec::new();
    match format {
        1 => {
            for _ in 0..count {
                glyphs.push(source.read_u16()?);
            }
        }
        2 => {
            for _ in 0..count {
                let start = source.read_u16()?;
                let end = source.read_u16()?;
                source.skip(2);
                glyphs.extend(start..=end);
            }
        }
        other => log::warn!("coverage format {} is unknown, treated as empty", other),
    }
    Ok(glyphs)
}
