//! Greedy composite-sequence tokenization.
//!
//! Composite sequences are tried in [`composite_order`]: at every position
//! the first sequence in that order that matches wins, so a longer conjunct
//! beats any of its prefixes. Text between matches is returned as plain runs.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Ordering of composite sequences: more characters first, then
/// lexicographic so equal-length sequences have a stable order.
pub fn composite_order(a: &str, b: &str) -> Ordering {
    b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| a.cmp(b))
}

/// One piece of tokenized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A known composite sequence.
    Composite(&'a str),
    /// Text matching no composite.
    Plain(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Composite(s) | Token::Plain(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompositeTokenizer {
    /// Candidates per first character, in composite order.
    by_first_char: HashMap<char, Vec<String>>,
}

impl CompositeTokenizer {
    pub fn new<I, S>(composites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = composites
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        sorted.sort_by(|a, b| composite_order(a, b));
        sorted.dedup();

        let mut by_first_char: HashMap<char, Vec<String>> = HashMap::new();
        for composite in sorted {
            if let Some(first) = composite.chars().next() {
                by_first_char.entry(first).or_default().push(composite);
            }
        }
        Self { by_first_char }
    }

    pub fn is_empty(&self) -> bool {
        self.by_first_char.is_empty()
    }

    /// Split `text` into composites and the plain runs between them.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut plain_start = 0;
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let Some(first) = rest.chars().next() else {
                break;
            };
            let matched = self
                .by_first_char
                .get(&first)
                .and_then(|candidates| candidates.iter().find(|c| rest.starts_with(c.as_str())));
            match matched {
                Some(composite) => {
                    if plain_start < pos {
                        tokens.push(Token::Plain(&text[plain_start..pos]));
                    }
                    let end = pos + composite.len();
                    tokens.push(Token::Composite(&text[pos..end]));
                    pos = end;
                    plain_start = end;
                }
                None => pos += first.len_utf8(),
            }
        }
        if plain_start < text.len() {
            tokens.push(Token::Plain(&text[plain_start..]));
        }
        tokens
    }
}
