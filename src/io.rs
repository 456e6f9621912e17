//! # Random-Access Font Source
//!
//! A seekable cursor over font bytes. Every binary parser in the crate reads
//! through a [`FontSource`]: big-endian integers for sfnt structures,
//! little-endian counterparts for the odd table that needs them, and a
//! single byte of pushback for the CMap lexer.
//!
//! The backing bytes are shared. [`FontSource::create_view`] hands out an
//! independent cursor (own position, own pushback) over the same buffer, so
//! the closure walker and the table copier can read one font side by side
//! without disturbing each other. A view is used from one thread at a time;
//! there is no locking.

use std::path::Path;
use std::sync::Arc;

use crate::error::{FontError, Result};

/// A cursor over shared, immutable font bytes.
#[derive(Debug, Clone)]
pub struct FontSource {
    data: Arc<[u8]>,
    pos: usize,
    pushback: Option<u8>,
}

impl FontSource {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            pushback: None,
        }
    }

    /// Read a whole font file into memory.
    ///
    /// The file handle is closed before this returns, whether or not the
    /// read succeeded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        log::debug!("opened {} ({} bytes)", path.as_ref().display(), bytes.len());
        Ok(Self::from_bytes(bytes))
    }

    /// An independent cursor over the same bytes, positioned at the start.
    pub fn create_view(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            pos: 0,
            pushback: None,
        }
    }

    pub fn length(&self) -> u64 {
        self.data.len() as u64
    }

    /// Current read position, accounting for a pushed-back byte.
    pub fn position(&self) -> u64 {
        match self.pushback {
            Some(_) => (self.pos as u64).saturating_sub(1),
            None => self.pos as u64,
        }
    }

    /// Move the cursor. Seeking discards any pushed-back byte. Seeking past
    /// the end is allowed; the next read fails.
    pub fn seek(&mut self, pos: u64) {
        self.pushback = None;
        self.pos = usize::try_from(pos).unwrap_or(usize::MAX);
    }

    pub fn skip(&mut self, n: u64) {
        let pos = self.position().saturating_add(n);
        self.seek(pos);
    }

    /// Read one byte, or `None` at end of data.
    pub fn read(&mut self) -> Option<u8> {
        if let Some(b) = self.pushback.take() {
            return Some(b);
        }
        let b = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    /// Return one byte to the stream; the next `read` yields it again.
    ///
    /// Only one byte of pushback is held. Pushing twice keeps the latest.
    pub fn push_back(&mut self, b: u8) {
        self.pushback = Some(b);
    }

    /// Fill `buf` completely or fail with `UnexpectedEndOfData`.
    pub fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let start = self.position();
        let mut filled = 0;
        if let Some(b) = self.pushback.take() {
            buf[0] = b;
            filled = 1;
        }
        let wanted = buf.len() - filled;
        let end = self.pos.checked_add(wanted).filter(|&e| e <= self.data.len());
        match end {
            Some(end) => {
                buf[filled..].copy_from_slice(&self.data[self.pos..end]);
                self.pos = end;
                Ok(())
            }
            None => Err(FontError::UnexpectedEndOfData {
                offset: start,
                wanted: buf.len(),
            }),
        }
    }

    /// Read `len` bytes into a fresh vector.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_fully(&mut buf)?;
        Ok(buf)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_fully(&mut buf)?;
        Ok(buf)
    }

    // ─── Big-endian ─────────────────────────────────────────────

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// A 64-bit value stored as two big-endian 32-bit halves.
    pub fn read_u64(&mut self) -> Result<u64> {
        let high = self.read_i32()? as u32 as u64;
        let low = self.read_i32()? as u32 as u64;
        Ok((high << 32) | low)
    }

    // ─── Little-endian ──────────────────────────────────────────

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let low = self.read_i32_le()? as u32 as u64;
        let high = self.read_i32_le()? as u32 as u64;
        Ok((high << 32) | low)
    }

    /// A 4-byte sfnt tag.
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        self.read_array()
    }

    /// `len` bytes read as Latin-1 text.
    pub fn read_latin1(&mut self, len: usize) -> Result<String> {
        Ok(self.read_bytes(len)?.into_iter().map(char::from).collect())
    }

    /// Borrow the backing bytes of `[offset, offset + len)`.
    pub fn slice(&self, offset: u64, len: usize) -> Result<&[u8]> {
        let start = usize::try_from(offset).ok();
        let range = start
            .and_then(|s| s.checked_add(len).map(|e| (s, e)))
            .filter(|&(_, e)| e <= self.data.len());
        match range {
            Some((s, e)) => Ok(&self.data[s..e]),
            None => Err(FontError::UnexpectedEndOfData {
                offset,
                wanted: len,
            }),
        }
    }
}
