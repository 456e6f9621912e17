//! # CMaps
//!
//! Parsing of PostScript CMap streams: the `/ToUnicode` maps of existing PDF
//! fonts, and the predefined `Uni*-UCS2-H` resources that give CJK
//! `Identity-H` fonts a CID → Unicode map when they carry no ToUnicode.
//!
//! Supported sections: `codespacerange`, `bfchar`, `bfrange` (incrementing
//! and array forms), `cidrange` and `cidchar`. `usecmap` is not followed.
//! Unknown operators are skipped; broken tokens fail with `InvalidCMap`.

pub mod lexer;
pub mod predefined;

use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::error::{FontError, Result};

use lexer::{Lexer, Token};

pub use predefined::{cid_to_unicode, ordering_cmap_name, CMapResources, DirectoryResources};

/// Byte codes of one length accepted by a CMap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpaceRange {
    pub low: u32,
    pub high: u32,
    /// Code length in bytes.
    pub len: usize,
}

impl CodeSpaceRange {
    fn contains(&self, code: u32, len: usize) -> bool {
        self.len == len && code >= self.low && code <= self.high
    }
}

/// A parsed CMap: code → Unicode text and code → CID.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    pub name: Option<String>,
    pub codespaces: Vec<CodeSpaceRange>,
    /// `bfchar`/`bfrange` destinations.
    pub unicode: HashMap<u32, String>,
    /// `cidchar`/`cidrange` destinations.
    pub cids: HashMap<u32, u32>,
}

/// Most codes one `bfrange`/`cidrange` entry may expand to.
const MAX_RANGE_CODES: u32 = 0x10000;

/// Codes covered by a range entry. Oversized ranges make the CMap invalid.
fn range_codes(section: &str, low: u32, high: u32) -> Result<RangeInclusive<u32>> {
    if high >= low && high - low >= MAX_RANGE_CODES {
        return Err(FontError::InvalidCMap(format!(
            "{} <{:X}> <{:X}> spans more than {} codes",
            section, low, high, MAX_RANGE_CODES
        )));
    }
    Ok(low..=high)
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

/// Decode UTF-16BE destination bytes, replacing unpaired surrogates.
fn utf16_text(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|c| u16::from_be_bytes([c[0], c.get(1).copied().unwrap_or(0)]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// `base` with its last UTF-16 unit advanced by `step`.
fn increment_utf16(base: &[u8], step: u32) -> String {
    let mut units: Vec<u16> = base
        .chunks(2)
        .map(|c| u16::from_be_bytes([c[0], c.get(1).copied().unwrap_or(0)]))
        .collect();
    if let Some(last) = units.last_mut() {
        *last = last.wrapping_add(step as u16);
    }
    String::from_utf16_lossy(&units)
}

impl CMap {
    /// Parse a CMap stream.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut parser = Parser {
            lexer: Lexer::new(data),
            cmap: CMap::default(),
            code_lengths: Vec::new(),
        };
        parser.run()?;
        let mut cmap = parser.cmap;
        if cmap.codespaces.is_empty() {
            // No declared code space: accept every code length the maps use
            let mut lengths = parser.code_lengths;
            lengths.sort_unstable();
            lengths.dedup();
            if lengths.is_empty() {
                lengths.push(2);
            }
            for len in lengths {
                cmap.codespaces.push(CodeSpaceRange {
                    low: 0,
                    high: if len >= 4 { u32::MAX } else { (1u32 << (8 * len)) - 1 },
                    len,
                });
            }
        }
        log::debug!(
            "CMap {:?}: {} code spaces, {} unicode, {} cid mappings",
            cmap.name,
            cmap.codespaces.len(),
            cmap.unicode.len(),
            cmap.cids.len()
        );
        Ok(cmap)
    }

    /// Unicode text for a character code.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.unicode.get(&code).map(String::as_str)
    }

    /// The next code in `bytes` at `offset`: the shortest prefix that falls
    /// in a code space range, else a single byte.
    pub fn next_code(&self, bytes: &[u8], offset: usize) -> (u32, usize) {
        for len in 1..=4 {
            if offset + len > bytes.len() {
                break;
            }
            let code = code_of(&bytes[offset..offset + len]);
            if self.codespaces.iter().any(|r| r.contains(code, len)) {
                return (code, len);
            }
        }
        (bytes.get(offset).copied().unwrap_or(0) as u32, 1)
    }

    /// Split a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        let mut codes = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let (code, len) = self.next_code(bytes, i);
            codes.push(code);
            i += len;
        }
        codes
    }
}

struct Parser {
    lexer: Lexer,
    cmap: CMap,
    code_lengths: Vec<usize>,
}

impl Parser {
    fn next(&mut self) -> Result<Option<Token>> {
        self.lexer.next_token()
    }

    /// Next token inside a section; end of input there is an error.
    fn expect(&mut self, section: &str) -> Result<Token> {
        self.next()?
            .ok_or_else(|| FontError::InvalidCMap(format!("unterminated {} section", section)))
    }

    fn run(&mut self) -> Result<()> {
        let mut previous: Option<Token> = None;
        while let Some(token) = self.next()? {
            match &token {
                Token::Keyword(k) => match k.as_str() {
                    "begincodespacerange" => self.codespace_section()?,
                    "beginbfchar" => self.bfchar_section()?,
                    "beginbfrange" => self.bfrange_section()?,
                    "begincidchar" => self.cidchar_section()?,
                    "begincidrange" => self.cidrange_section()?,
                    "usecmap" => {
                        if let Some(Token::Name(parent)) = &previous {
                            log::debug!("CMap uses parent '{}', not followed", parent);
                        }
                    }
                    _ => {}
                },
                Token::Name(n) if n == "CMapName" => {
                    if let Some(Token::Name(name)) = self.next()? {
                        self.cmap.name = Some(name);
                    }
                }
                _ => {}
            }
            previous = Some(token);
        }
        Ok(())
    }

    fn codespace_section(&mut self) -> Result<()> {
        loop {
            match self.expect("codespacerange")? {
                Token::Keyword(k) if k == "endcodespacerange" => return Ok(()),
                Token::HexString(low) => {
                    let Token::HexString(high) = self.expect("codespacerange")? else {
                        log::warn!("codespacerange entry without a high bound, skipped");
                        continue;
                    };
                    if low.len() != high.len() || low.is_empty() || low.len() > 4 {
                        log::warn!("codespacerange bounds of different lengths, skipped");
                        continue;
                    }
                    self.cmap.codespaces.push(CodeSpaceRange {
                        low: code_of(&low),
                        high: code_of(&high),
                        len: low.len(),
                    });
                }
                other => log::warn!("unexpected {:?} in codespacerange, skipped", other),
            }
        }
    }

    fn bfchar_section(&mut self) -> Result<()> {
        loop {
            match self.expect("bfchar")? {
                Token::Keyword(k) if k == "endbfchar" => return Ok(()),
                Token::HexString(src) => match self.expect("bfchar")? {
                    Token::HexString(dst) => {
                        self.code_lengths.push(src.len());
                        self.cmap.unicode.insert(code_of(&src), utf16_text(&dst));
                    }
                    other => log::warn!("bfchar destination {:?} is not a string, skipped", other),
                },
                other => log::warn!("unexpected {:?} in bfchar, skipped", other),
            }
        }
    }

    fn bfrange_section(&mut self) -> Result<()> {
        loop {
            let low = match self.expect("bfrange")? {
                Token::Keyword(k) if k == "endbfrange" => return Ok(()),
                Token::HexString(low) => low,
                other => {
                    log::warn!("unexpected {:?} in bfrange, skipped", other);
                    continue;
                }
            };
            let Token::HexString(high) = self.expect("bfrange")? else {
                log::warn!("bfrange entry without a high bound, skipped");
                continue;
            };
            self.code_lengths.push(low.len());
            let (low, high) = (code_of(&low), code_of(&high));
            let codes = range_codes("bfrange", low, high)?;
            match self.expect("bfrange")? {
                Token::HexString(base) => {
                    for (step, code) in codes.enumerate() {
                        self.cmap.unicode.insert(code, increment_utf16(&base, step as u32));
                    }
                }
                Token::ArrayStart => {
                    let mut code = low;
                    loop {
                        match self.expect("bfrange")? {
                            Token::ArrayEnd => break,
                            Token::HexString(dst) => {
                                if code <= high {
                                    self.cmap.unicode.insert(code, utf16_text(&dst));
                                }
                                code = code.saturating_add(1);
                            }
                            other => log::warn!("unexpected {:?} in bfrange array, skipped", other),
                        }
                    }
                }
                other => log::warn!("bfrange destination {:?} is not a string, skipped", other),
            }
        }
    }

    fn cidchar_section(&mut self) -> Result<()> {
        loop {
            match self.expect("cidchar")? {
                Token::Keyword(k) if k == "endcidchar" => return Ok(()),
                Token::HexString(src) => match self.expect("cidchar")? {
                    Token::Integer(cid) if cid >= 0 => {
                        self.code_lengths.push(src.len());
                        self.cmap.cids.insert(code_of(&src), cid as u32);
                    }
                    other => log::warn!("cidchar destination {:?} is not a CID, skipped", other),
                },
                other => log::warn!("unexpected {:?} in cidchar, skipped", other),
            }
        }
    }

    fn cidrange_section(&mut self) -> Result<()> {
        loop {
            let low = match self.expect("cidrange")? {
                Token::Keyword(k) if k == "endcidrange" => return Ok(()),
                Token::HexString(low) => low,
                other => {
                    log::warn!("unexpected {:?} in cidrange, skipped", other);
                    continue;
                }
            };
            let (Token::HexString(high), Token::Integer(cid)) =
                (self.expect("cidrange")?, self.expect("cidrange")?)
            else {
                log::warn!("malformed cidrange entry, skipped");
                continue;
            };
            let Ok(cid) = u32::try_from(cid) else {
                log::warn!("cidrange start CID {} out of range, skipped", cid);
                continue;
            };
            self.code_lengths.push(low.len());
            let codes = range_codes("cidrange", code_of(&low), code_of(&high))?;
            for (step, code) in codes.enumerate() {
                let Some(cid) = cid.checked_add(step as u32) else {
                    log::warn!("cidrange at <{:X}> runs past the last CID", code);
                    break;
                };
                self.cmap.cids.insert(code, cid);
            }
        }
    }
}
