//! # sfnt Assembly
//!
//! Writes a fresh sfnt file: 12-byte offset table, one 16-byte directory
//! entry per table, then the table data, each padded to a 4-byte boundary.

use super::directory::{Tag, TRUETYPE_VERSION};

/// Binary-search fields of the sfnt offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFields {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

/// `entrySelector = floor(log2(n))`, `searchRange = 2^entrySelector * 16`,
/// `rangeShift = (n - 2^entrySelector) * 16`.
pub fn search_fields(num_tables: u16) -> SearchFields {
    let entry_selector = if num_tables == 0 {
        0
    } else {
        15 - num_tables.leading_zeros() as u16
    };
    let power = 1u16 << entry_selector;
    SearchFields {
        search_range: power.wrapping_mul(16),
        entry_selector,
        range_shift: num_tables.saturating_sub(power).wrapping_mul(16),
    }
}

/// The standard sfnt checksum: big-endian u32 words summed with wrapping.
/// A trailing partial word counts as zero-padded.
pub fn table_checksum(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(4);
    let mut sum = 0u32;
    for word in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes([word[0], word[1], word[2], word[3]]));
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut last = [0u8; 4];
        last[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

/// Round `len` up to the next multiple of four.
pub fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

struct PendingTable {
    tag: Tag,
    checksum: u32,
    /// Length recorded in the directory (un-padded).
    length: u32,
    data: Vec<u8>,
}

/// Builder for an sfnt font file.
pub struct SfntWriter {
    tables: Vec<PendingTable>,
}

impl Default for SfntWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SfntWriter {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Add a table whose checksum is computed from `data`.
    pub fn add_table(&mut self, tag: [u8; 4], data: Vec<u8>) {
        let checksum = table_checksum(&data);
        self.add_table_with_checksum(tag, checksum, data);
    }

    /// Add a table with a checksum taken from elsewhere (e.g. the source
    /// directory of a table copied verbatim).
    pub fn add_table_with_checksum(&mut self, tag: [u8; 4], checksum: u32, data: Vec<u8>) {
        self.tables.push(PendingTable {
            tag: Tag(tag),
            checksum,
            length: data.len() as u32,
            data,
        });
    }

    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// Lay out the directory and concatenate the tables, sorted by tag.
    pub fn finish(mut self) -> Vec<u8> {
        self.tables.sort_by_key(|t| t.tag);

        let num_tables = self.tables.len() as u16;
        let fields = search_fields(num_tables);
        let dir_size = 12 + self.tables.len() * 16;
        let body_size: usize = self.tables.iter().map(|t| padded_len(t.data.len())).sum();

        let mut output: Vec<u8> = Vec::with_capacity(dir_size + body_size);
        output.extend_from_slice(&TRUETYPE_VERSION.to_be_bytes());
        output.extend_from_slice(&num_tables.to_be_bytes());
        output.extend_from_slice(&fields.search_range.to_be_bytes());
        output.extend_from_slice(&fields.entry_selector.to_be_bytes());
        output.extend_from_slice(&fields.range_shift.to_be_bytes());

        let mut table_offset = dir_size;
        for table in &self.tables {
            output.extend_from_slice(&table.tag.0);
            output.extend_from_slice(&table.checksum.to_be_bytes());
            output.extend_from_slice(&(table_offset as u32).to_be_bytes());
            output.extend_from_slice(&table.length.to_be_bytes());
            table_offset += padded_len(table.data.len());
        }

        for table in &self.tables {
            output.extend_from_slice(&table.data);
            output.resize(padded_len(output.len()), 0);
        }

        output
    }
}
