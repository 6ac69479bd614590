//! Splitting raw command lines into bounded token sequences.

use std::fmt;

/// Characters that separate tokens in a command line.
pub const WHITESPACE: &[char] = &[' ', '\t', '\n'];

/// An ordered, bounded list of non-empty tokens.
///
/// Token 0 is the command name, the rest are its arguments. The sequence never
/// has gaps: [`get`](Self::get) returns `Some` for every index below
/// [`len`](Self::len) and `None` from there on. Once [`capacity`](Self::capacity)
/// tokens are stored, further tokens are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<String>,
    capacity: usize,
}

impl TokenSequence {
    /// Create an empty sequence that will hold at most `capacity` tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a token. Returns `false`, leaving the sequence untouched, when
    /// the sequence is already full.
    pub fn push(&mut self, token: impl Into<String>) -> bool {
        if self.is_full() {
            return false;
        }
        self.tokens.push(token.into());
        true
    }

    /// Number of tokens before the sentinel.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the line held no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether further pushes will be refused.
    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.capacity
    }

    /// Most tokens this sequence will ever hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Token at `index`, or `None` at and past the sentinel.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// The command name, token 0.
    pub fn name(&self) -> Option<&str> {
        self.get(0)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    /// Tokens in order, command name first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// All tokens as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Index of the first token equal to `token`, looking at indices `from..`.
    pub fn position(&self, from: usize, token: &str) -> Option<usize> {
        self.tokens
            .iter()
            .skip(from)
            .position(|t| t == token)
            .map(|i| i + from)
    }

    /// Move the end-of-sequence sentinel to `index`, dropping it and every
    /// token after it.
    pub fn truncate(&mut self, index: usize) {
        self.tokens.truncate(index);
    }
}

impl fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Split `line` on runs of [`WHITESPACE`] into at most `max_tokens` tokens.
///
/// Empty pieces produced by consecutive separators are skipped, and tokens past
/// `max_tokens` are silently dropped. An empty or blank line produces an empty
/// sequence; there is no failure case.
pub fn split_into_tokens(line: &str, max_tokens: usize) -> TokenSequence {
    let mut tokens = TokenSequence::with_capacity(max_tokens);
    for piece in line.split(WHITESPACE).filter(|piece| !piece.is_empty()) {
        if !tokens.push(piece) {
            break;
        }
    }
    tokens
}
