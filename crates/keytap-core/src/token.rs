//! Decoded keystrokes.

use std::fmt;

use crate::keys::{self, SpecialKey};

/// Escape byte that opens CSI and SS3 sequences.
pub const ESC: u8 = 0x1B;

/// One fully decoded logical keystroke.
///
/// Downstream consumers treat tokens as opaque strings: they print through
/// [`Display`](fmt::Display) and compare against `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A single Unicode scalar (ASCII or decoded UTF-8).
    Char(char),
    /// A complete CSI or SS3 escape sequence, ESC included.
    ///
    /// Every byte of a sequence is ASCII, so the raw bytes are kept as a
    /// string.
    Escape(String),
}

impl Token {
    /// Build an escape token from raw sequence bytes.
    ///
    /// Bytes are mapped one-to-one to chars; the decoder only calls this with
    /// ASCII bytes.
    pub(crate) fn escape(bytes: &[u8]) -> Self {
        Self::Escape(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// Whether this token is a CSI/SS3 escape sequence.
    pub fn is_escape(&self) -> bool {
        matches!(self, Self::Escape(_))
    }

    /// The character, if this is a plain character token.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            Self::Escape(_) => None,
        }
    }

    /// Raw bytes as they arrived from the terminal (UTF-8 for characters).
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Char(c) => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf).as_bytes().to_vec()
            },
            Self::Escape(seq) => seq.as_bytes().to_vec(),
        }
    }

    /// Name of the special key this sequence encodes, if it is a known one.
    pub fn special_key(&self) -> Option<SpecialKey> {
        match self {
            Self::Char(_) => None,
            Self::Escape(seq) => keys::lookup(seq),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Escape(seq) => f.write_str(seq),
        }
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        match self {
            Self::Char(c) => {
                let mut chars = other.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            },
            Self::Escape(seq) => seq == other,
        }
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<char> for Token {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}
