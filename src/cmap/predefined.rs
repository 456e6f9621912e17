//! Predefined CJK CMaps.
//!
//! An `Identity-H` font with a known Adobe character collection but no
//! `/ToUnicode` can still be decoded: the collection's `Uni*-UCS2-H` CMap
//! maps Unicode to CIDs, and inverting it gives CID → Unicode.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;

use super::CMap;

/// Where CMap resource files come from.
pub trait CMapResources {
    /// Raw bytes of the named CMap, or `None` if it is not available.
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// CMap resources stored as files named after the CMap in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CMapResources for DirectoryResources {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>> {
        // CMap names never contain path separators
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Ok(None);
        }
        let path = self.root.join(name);
        if !path.is_file() {
            log::debug!("CMap resource {} not found", path.display());
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

/// The Unicode CMap for an Adobe character collection.
pub fn ordering_cmap_name(registry: &str, ordering: &str) -> Option<&'static str> {
    if registry != "Adobe" {
        return None;
    }
    match ordering {
        "GB1" => Some("UniGB-UCS2-H"),
        "CNS1" => Some("UniCNS-UCS2-H"),
        "Japan1" => Some("UniJIS-UCS2-H"),
        "Korea1" => Some("UniKS-UCS2-H"),
        _ => None,
    }
}

/// CID → Unicode text for an Adobe character collection, or `None` when the
/// collection is unknown or its CMap is not available.
///
/// Where several code points map to one CID the lowest one wins.
pub fn cid_to_unicode(
    resources: &dyn CMapResources,
    registry: &str,
    ordering: &str,
) -> Result<Option<HashMap<u32, String>>> {
    let Some(name) = ordering_cmap_name(registry, ordering) else {
        return Ok(None);
    };
    let Some(data) = resources.load(name)? else {
        log::warn!("no CMap resource for {}-{} ({})", registry, ordering, name);
        return Ok(None);
    };
    let cmap = CMap::parse(&data)?;

    let mut codes: Vec<(u32, u32)> = cmap.cids.into_iter().collect();
    codes.sort_unstable();
    let mut inverted = HashMap::with_capacity(codes.len());
    for (code, cid) in codes {
        // UCS2 codes are BMP code units
        if let Some(c) = char::from_u32(code) {
            inverted.entry(cid).or_insert_with(|| c.to_string());
        }
    }
    Ok(Some(inverted))
}
