//! PostScript tokens for CMap streams.
//!
//! Reads through a [`FontSource`], using its one-byte pushback to look a
//! character ahead at token boundaries (`<` vs `<<`, end of a number).

use crate::error::{FontError, Result};
use crate::io::FontSource;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `<...>` decoded to bytes.
    HexString(Vec<u8>),
    /// `(...)` with escapes resolved.
    LiteralString(Vec<u8>),
    /// `/Name` without the slash.
    Name(String),
    Integer(i64),
    Real(f64),
    /// Any other bare word: operators like `begincmap`, `def`, `usecmap`.
    Keyword(String),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
    ProcStart,
    ProcEnd,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, 0 | b'\t' | b'\n' | 0x0C | b'\r' | b' ')
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

pub struct Lexer {
    source: FontSource,
}

impl Lexer {
    pub fn new(data: &[u8]) -> Self {
        Self {
            source: FontSource::from_bytes(data.to_vec()),
        }
    }

    fn error(&self, message: &str) -> FontError {
        FontError::InvalidCMap(format!("{} at byte {}", message, self.source.position()))
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let b = loop {
            match self.source.read() {
                None => return Ok(None),
                Some(b'%') => self.skip_comment(),
                Some(b) if is_whitespace(b) => {}
                Some(b) => break b,
            }
        };

        let token = match b {
            b'[' => Token::ArrayStart,
            b']' => Token::ArrayEnd,
            b'{' => Token::ProcStart,
            b'}' => Token::ProcEnd,
            b'<' => match self.source.read() {
                Some(b'<') => Token::DictStart,
                Some(other) => {
                    self.source.push_back(other);
                    Token::HexString(self.read_hex_string()?)
                }
                None => return Err(self.error("unterminated hex string")),
            },
            b'>' => match self.source.read() {
                Some(b'>') => Token::DictEnd,
                _ => return Err(self.error("stray '>'")),
            },
            b'(' => Token::LiteralString(self.read_literal_string()?),
            b')' => return Err(self.error("stray ')'")),
            b'/' => Token::Name(self.read_word(None)),
            other => {
                let word = self.read_word(Some(other));
                if let Ok(i) = word.parse::<i64>() {
                    Token::Integer(i)
                } else if let Some(r) = parse_real(&word) {
                    Token::Real(r)
                } else {
                    Token::Keyword(word)
                }
            }
        };
        Ok(Some(token))
    }

    fn skip_comment(&mut self) {
        while let Some(b) = self.source.read() {
            if b == b'\n' || b == b'\r' {
                break;
            }
        }
    }

    /// Regular characters up to the next whitespace or delimiter.
    fn read_word(&mut self, first: Option<u8>) -> String {
        let mut word: Vec<u8> = first.into_iter().collect();
        while let Some(b) = self.source.read() {
            if is_whitespace(b) || is_delimiter(b) {
                self.source.push_back(b);
                break;
            }
            word.push(b);
        }
        String::from_utf8_lossy(&word).into_owned()
    }

    fn read_hex_string(&mut self) -> Result<Vec<u8>> {
        let mut nibbles = Vec::new();
        loop {
            match self.source.read() {
                None => return Err(self.error("unterminated hex string")),
                Some(b'>') => break,
                Some(b) if is_whitespace(b) => {}
                Some(b) => match hex_value(b) {
                    Some(v) => nibbles.push(v),
                    None => return Err(self.error("invalid hex digit")),
                },
            }
        }
        // An odd final digit is followed by an implied 0
        if nibbles.len() % 2 == 1 {
            nibbles.push(0);
        }
        Ok(nibbles.chunks(2).map(|p| (p[0] << 4) | p[1]).collect())
    }

    fn read_literal_string(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut depth = 1;
        loop {
            let Some(b) = self.source.read() else {
                return Err(self.error("unterminated literal string"));
            };
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    out.push(b);
                }
                b'\\' => self.read_escape(&mut out)?,
                _ => out.push(b),
            }
        }
        Ok(out)
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let Some(b) = self.source.read() else {
            return Err(self.error("unterminated literal string"));
        };
        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'\r' => {
                // Line continuation, \r\n counts as one
                if let Some(next) = self.source.read() {
                    if next != b'\n' {
                        self.source.push_back(next);
                    }
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = (b - b'0') as u32;
                for _ in 0..2 {
                    match self.source.read() {
                        Some(d @ b'0'..=b'7') => value = value * 8 + (d - b'0') as u32,
                        Some(other) => {
                            self.source.push_back(other);
                            break;
                        }
                        None => break,
                    }
                }
                out.push(value as u8);
            }
            other => out.push(other),
        }
        Ok(())
    }
}

fn parse_real(word: &str) -> Option<f64> {
    let valid = !word.is_empty()
        && word.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        && word.chars().any(|c| c.is_ascii_digit());
    if valid {
        word.parse().ok()
    } else {
        None
    }
}
