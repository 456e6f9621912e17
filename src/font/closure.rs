//! # Glyph Closure
//!
//! Starting from the glyphs the document references, follows composite
//! component references until every glyph needed to draw them is known.
//!
//! The walk is an explicit FIFO work queue plus a membership set; a glyph is
//! queued at most once, so self-references and mutual references cannot loop.
//! The component edges seen along the way are kept and checked for cycles
//! afterwards: a composite that (transitively) contains itself can never be
//! rendered and is reported as an invalid font.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::error::{FontError, Result};
use crate::io::FontSource;

use super::glyf::{read_glyph, Glyph, LocaTable};

/// Compute the retained glyph set for `used`, always including glyph 0.
///
/// Glyph ids past the end of `loca` are dropped with a warning: they have no
/// outline to retain.
pub fn glyph_closure(
    source: &mut FontSource,
    glyf_offset: u32,
    loca: &LocaTable,
    used: &HashSet<u16>,
) -> Result<BTreeSet<u16>> {
    let num_glyphs = loca.num_glyphs();
    let mut retained: HashSet<u16> = HashSet::with_capacity(used.len() + 1);
    let mut queue: VecDeque<u16> = VecDeque::with_capacity(used.len() + 1);
    let mut edges: HashMap<u16, Vec<u16>> = HashMap::new();

    let mut seed: Vec<u16> = used.iter().copied().collect();
    seed.sort_unstable();
    for glyph in std::iter::once(0).chain(seed) {
        if (glyph as usize) >= num_glyphs {
            log::warn!("glyph {} is past the last glyph ({}), ignored", glyph, num_glyphs);
            continue;
        }
        if retained.insert(glyph) {
            queue.push_back(glyph);
        }
    }

    while let Some(glyph) = queue.pop_front() {
        let components = match read_glyph(source, glyf_offset, loca, glyph)? {
            Glyph::Composite { components } => components,
            Glyph::Empty | Glyph::Simple { .. } => continue,
        };
        let mut children = Vec::with_capacity(components.len());
        for component in components {
            if (component.glyph as usize) >= num_glyphs {
                return Err(FontError::InvalidFontFormat(format!(
                    "glyph {} references missing component glyph {}",
                    glyph, component.glyph
                )));
            }
            if retained.insert(component.glyph) {
                queue.push_back(component.glyph);
            }
            children.push(component.glyph);
        }
        edges.insert(glyph, children);
    }

    check_acyclic(&edges)?;

    log::debug!(
        "glyph closure: {} used -> {} retained ({} composites)",
        used.len(),
        retained.len(),
        edges.len()
    );
    Ok(retained.into_iter().collect())
}

/// Fail if any composite reaches itself through its components.
fn check_acyclic(edges: &HashMap<u16, Vec<u16>>) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    let mut marks: HashMap<u16, Mark> = HashMap::with_capacity(edges.len());
    let mut roots: Vec<u16> = edges.keys().copied().collect();
    roots.sort_unstable();

    for root in roots {
        if marks.contains_key(&root) {
            continue;
        }
        // Iterative DFS: (glyph, index of next child to visit)
        let mut stack: Vec<(u16, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::InProgress);
        while let Some(top) = stack.last_mut() {
            let glyph = top.0;
            let children = edges.get(&glyph).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&child) = children.get(top.1) {
                top.1 += 1;
                match marks.get(&child) {
                    Some(Mark::InProgress) => {
                        return Err(FontError::InvalidFontFormat(format!(
                            "composite glyph {} contains itself (via glyph {})",
                            child, glyph
                        )));
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(child, Mark::InProgress);
                        stack.push((child, 0));
                    }
                }
            } else {
                marks.insert(glyph, Mark::Done);
                stack.pop();
            }
        }
    }
    Ok(())
}
