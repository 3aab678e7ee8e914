//! Escape-sequence decoder.
//!
//! Classifies a raw terminal byte stream into [`Token`]s, one byte at a time,
//! without blocking. Three disjoint families are recognised:
//!
//! 1. Plain ASCII (`< 0x80`, not ESC): emitted immediately.
//! 2. UTF-8 multi-byte characters: a byte `>= 0x80` opens an accumulation that
//!    is retried as UTF-8 after every byte. Leading bytes that cannot begin a
//!    scalar are dropped one at a time until the rest is a valid prefix.
//! 3. CSI (`ESC [`) and SS3 (`ESC O`) escape sequences.
//!
//! # State Machine
//!
//! ```text
//!            ESC              '['           '1'..'8'
//! ┌────────┐────>┌────────┐─────>┌─────┐──────────>┌──────────┐
//! │ Ground │     │ Escape │      │ Csi │           │ CsiParam │──┐ '0'..'9'
//! └────────┘<────└────────┘      └─────┘           └──────────┘<─┘
//!   │   ^  other     │ 'O'          │ other <0x80        │ '~'
//!   │   │            ↓              ↓                    ↓
//!   │   │         ┌─────┐  <0x80  emit Escape token   emit Escape token
//!   │   │         │ Ss3 │───────> emit Escape token
//!   │   │         └─────┘
//!   │   │ complete / ASCII break
//!   │ ┌──────┐
//!   └>│ Utf8 │  (>= 0x80)
//!     └──────┘
//! ```
//!
//! A byte that breaks a candidate discards the candidate and is reclassified
//! from `Ground`. A second ESC restarts the escape candidate. A parameter
//! digit past [`MAX_CSI_PARAM_LEN`] breaks the candidate like any other byte.
//!
//! # Limitations
//!
//! A lone ESC is never emitted on its own: it is held until the next byte
//! either extends it into a sequence or discards it. Callers that need a bare
//! ESC key must agree on a different encoding with the terminal.

use crate::token::{ESC, Token};

/// Longest UTF-8 encoding of a single scalar.
pub const MAX_UTF8_LEN: usize = 4;

/// Most parameter digits a CSI candidate may carry before it is abandoned.
pub const MAX_CSI_PARAM_LEN: usize = 16;

/// Upper bound on buffered bytes: `ESC [` plus a full parameter.
pub const MAX_PENDING_LEN: usize = 2 + MAX_CSI_PARAM_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing buffered.
    Ground,
    /// `ESC` seen.
    Escape,
    /// `ESC O` seen.
    Ss3,
    /// `ESC [` seen.
    Csi,
    /// `ESC [` followed by one or more digits.
    CsiParam,
    /// One or more bytes `>= 0x80` awaiting a complete UTF-8 scalar.
    Utf8,
}

enum Utf8Status {
    Complete(char),
    Incomplete,
    Invalid,
}

/// Byte-at-a-time keystroke decoder.
///
/// Pure state machine: no I/O, no threads, no clock. Feed bytes in arrival
/// order and collect the tokens it emits.
///
/// # Invariants
///
/// - At most one token is emitted per byte fed.
/// - The pending buffer holds at most [`MAX_UTF8_LEN`] bytes while decoding
///   UTF-8 and never more than [`MAX_PENDING_LEN`] bytes overall.
#[derive(Debug, Clone)]
pub struct Decoder {
    state: State,
    pending: Vec<u8>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a decoder with nothing pending.
    pub fn new() -> Self {
        Self { state: State::Ground, pending: Vec::with_capacity(8) }
    }

    /// Whether a partial sequence is buffered.
    pub fn is_pending(&self) -> bool {
        self.state != State::Ground
    }

    /// Number of buffered bytes not yet classified.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Discard any partial sequence.
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.pending.clear();
    }

    /// Feed one byte, returning the token it completes, if any.
    pub fn feed(&mut self, byte: u8) -> Option<Token> {
        match self.state {
            State::Ground => self.ground(byte),
            State::Escape => match byte {
                ESC => self.restart_escape(),
                b'[' => self.advance(State::Csi, byte),
                b'O' => self.advance(State::Ss3, byte),
                _ => self.abort(byte),
            },
            State::Ss3 => match byte {
                ESC => self.restart_escape(),
                0x00..=0x7F => self.complete(byte),
                _ => self.abort(byte),
            },
            State::Csi => match byte {
                ESC => self.restart_escape(),
                b'1'..=b'8' => self.advance(State::CsiParam, byte),
                0x00..=0x7F => self.complete(byte),
                _ => self.abort(byte),
            },
            State::CsiParam => match byte {
                ESC => self.restart_escape(),
                b'~' => self.complete(byte),
                b'0'..=b'9' if self.pending.len() < MAX_PENDING_LEN => {
                    self.advance(State::CsiParam, byte)
                },
                _ => self.abort(byte),
            },
            State::Utf8 => self.utf8(byte),
        }
    }

    /// Feed a slice of bytes, returning every token completed along the way.
    pub fn feed_all(&mut self, bytes: &[u8]) -> Vec<Token> {
        bytes.iter().filter_map(|&b| self.feed(b)).collect()
    }

    /// Classify a byte with nothing pending.
    fn ground(&mut self, byte: u8) -> Option<Token> {
        self.reset();
        match byte {
            ESC => {
                self.pending.push(ESC);
                self.state = State::Escape;
                None
            },
            0x00..=0x7F => Some(Token::Char(char::from(byte))),
            _ => {
                self.state = State::Utf8;
                self.utf8(byte)
            },
        }
    }

    fn advance(&mut self, next: State, byte: u8) -> Option<Token> {
        self.pending.push(byte);
        self.state = next;
        None
    }

    fn complete(&mut self, byte: u8) -> Option<Token> {
        self.pending.push(byte);
        let token = Token::escape(&self.pending);
        self.reset();
        Some(token)
    }

    fn restart_escape(&mut self) -> Option<Token> {
        self.reset();
        self.pending.push(ESC);
        self.state = State::Escape;
        None
    }

    /// Drop the current candidate and reclassify the breaking byte.
    fn abort(&mut self, byte: u8) -> Option<Token> {
        self.reset();
        self.ground(byte)
    }

    fn utf8(&mut self, byte: u8) -> Option<Token> {
        // ASCII can never continue a multi-byte sequence
        if byte < 0x80 {
            return self.abort(byte);
        }

        self.pending.push(byte);
        loop {
            match classify_utf8(&self.pending) {
                Utf8Status::Complete(c) => {
                    self.reset();
                    return Some(Token::Char(c));
                },
                Utf8Status::Incomplete => return None,
                // The oldest byte can never start a scalar with what follows
                Utf8Status::Invalid => {
                    self.pending.remove(0);
                    if self.pending.is_empty() {
                        self.state = State::Ground;
                        return None;
                    }
                },
            }
        }
    }
}

fn classify_utf8(bytes: &[u8]) -> Utf8Status {
    match std::str::from_utf8(bytes) {
        Ok(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Utf8Status::Complete(c),
                _ => Utf8Status::Invalid,
            }
        },
        Err(e) if e.valid_up_to() == 0 && e.error_len().is_none() => Utf8Status::Incomplete,
        Err(_) => Utf8Status::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<Token> {
        Decoder::new().feed_all(bytes)
    }

    #[test]
    fn ascii_is_emitted_immediately() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(b'h'), Some(Token::Char('h')));
        assert_eq!(decoder.feed(b'\r'), Some(Token::Char('\r')));
        assert_eq!(decoder.feed(0x7F), Some(Token::Char('\u{7f}')));
        assert!(!decoder.is_pending());
    }

    #[test]
    fn two_byte_utf8_waits_for_final_byte() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0xC3), None);
        assert!(decoder.is_pending());
        assert_eq!(decoder.feed(0xA9), Some(Token::Char('é')));
        assert!(!decoder.is_pending());
    }

    #[test]
    fn four_byte_utf8() {
        assert_eq!(decode("🦀".as_bytes()), vec![Token::Char('🦀')]);
    }

    #[test]
    fn csi_letter_completes_three_byte_sequence() {
        assert_eq!(decode(b"\x1b[A"), vec![Token::Escape("\u{1b}[A".into())]);
    }

    #[test]
    fn ss3_completes_on_third_byte() {
        assert_eq!(decode(b"\x1bOP"), vec![Token::Escape("\u{1b}OP".into())]);
    }

    #[test]
    fn csi_parameter_completes_on_tilde() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x1B), None);
        assert_eq!(decoder.feed(b'['), None);
        assert_eq!(decoder.feed(b'5'), None);
        assert_eq!(decoder.feed(b'~'), Some(Token::Escape("\u{1b}[5~".into())));
    }

    #[test]
    fn csi_parameter_accepts_further_digits() {
        assert_eq!(decode(b"\x1b[15~"), vec![Token::Escape("\u{1b}[15~".into())]);
        assert_eq!(decode(b"\x1b[209~"), vec![Token::Escape("\u{1b}[209~".into())]);
    }

    #[test]
    fn longest_parameter_still_completes() {
        let mut seq = b"\x1b[1".to_vec();
        seq.extend([b'0'; MAX_CSI_PARAM_LEN - 1]);
        seq.push(b'~');

        let tokens = decode(&seq);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].to_bytes(), seq);
    }

    #[test]
    fn overlong_parameter_is_abandoned() {
        let mut decoder = Decoder::new();
        decoder.feed_all(b"\x1b[1");
        let tokens = decoder.feed_all(&[b'0'; 100_000]);

        assert!(decoder.pending_len() <= MAX_PENDING_LEN);
        assert!(!decoder.is_pending());
        // Digits past the cap are reclassified as plain characters
        assert_eq!(tokens.len(), 100_000 - (MAX_CSI_PARAM_LEN - 1));
        assert!(tokens.iter().all(|t| *t == Token::Char('0')));
        assert_eq!(decoder.feed(b'~'), Some(Token::Char('~')));
    }

    #[test]
    fn csi_with_digit_outside_parameter_range_completes() {
        // Only '1'..'8' open a parameter
        assert_eq!(decode(b"\x1b[9"), vec![Token::Escape("\u{1b}[9".into())]);
        assert_eq!(decode(b"\x1b[0"), vec![Token::Escape("\u{1b}[0".into())]);
    }

    #[test]
    fn broken_parameter_reclassifies_breaking_byte() {
        // Modifier syntax is not supported: ';' breaks the parameter
        assert_eq!(
            decode(b"\x1b[1;5A"),
            vec![Token::Char(';'), Token::Char('5'), Token::Char('A')]
        );
    }

    #[test]
    fn second_escape_restarts_candidate() {
        assert_eq!(decode(b"\x1b\x1b[A"), vec![Token::Escape("\u{1b}[A".into())]);
        assert_eq!(decode(b"\x1b[\x1bOQ"), vec![Token::Escape("\u{1b}OQ".into())]);
        assert_eq!(decode(b"\x1b[2\x1b[B"), vec![Token::Escape("\u{1b}[B".into())]);
    }

    #[test]
    fn escape_followed_by_plain_byte_drops_escape() {
        assert_eq!(decode(b"\x1bx"), vec![Token::Char('x')]);
    }

    #[test]
    fn lone_escape_is_held() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x1B), None);
        assert!(decoder.is_pending());
        assert_eq!(decoder.pending_len(), 1);
    }

    #[test]
    fn high_byte_aborts_escape_candidates() {
        assert_eq!(decode(b"\x1b[\xC3\xA9"), vec![Token::Char('é')]);
        assert_eq!(decode(b"\x1bO\xC3\xA9"), vec![Token::Char('é')]);
        assert_eq!(decode(b"\x1b\xC3\xA9"), vec![Token::Char('é')]);
        assert_eq!(decode(b"\x1b[12\xC3\xA9"), vec![Token::Char('é')]);
    }

    #[test]
    fn ascii_breaks_utf8_accumulation() {
        assert_eq!(decode(b"\xC3A"), vec![Token::Char('A')]);
        assert_eq!(decode(b"\xE2\x82\x1b[A"), vec![Token::Escape("\u{1b}[A".into())]);
    }

    #[test]
    fn stray_continuation_bytes_stay_bounded() {
        let mut decoder = Decoder::new();
        for _ in 0..32 {
            assert_eq!(decoder.feed(0x80), None);
            assert!(decoder.pending_len() <= MAX_UTF8_LEN);
        }
    }

    #[test]
    fn undecodable_leading_bytes_are_dropped() {
        // 0xFF never starts a scalar
        let mut decoder = Decoder::new();
        let mut emitted = Vec::new();
        for &b in &[0xFF, 0xF0, 0x9F, 0xA6, 0x80] {
            emitted.extend(decoder.feed(b));
        }
        assert_eq!(emitted, vec![Token::Char('🦀')]);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn garbage_before_scalar_does_not_hide_it() {
        assert_eq!(decode(&[0x80, 0x80, 0x80, 0xC3, 0xA9]), vec![Token::Char('é')]);
        assert_eq!(decode(&[0xF0, 0xC3, 0xA9]), vec![Token::Char('é')]);
    }

    #[test]
    fn lone_continuation_byte_returns_to_ground() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x80), None);
        assert!(!decoder.is_pending());
        assert_eq!(decoder.feed(b'a'), Some(Token::Char('a')));
    }

    #[test]
    fn reset_discards_pending() {
        let mut decoder = Decoder::new();
        decoder.feed(0x1B);
        decoder.feed(b'[');
        decoder.reset();
        assert_eq!(decoder.feed(b'A'), Some(Token::Char('A')));
    }

    #[test]
    fn mixed_stream() {
        let tokens = decode(b"a\xC3\xA9\x1b[Ab\x1bOPc");
        let expected: Vec<Token> = vec![
            'a'.into(),
            'é'.into(),
            Token::Escape("\u{1b}[A".into()),
            'b'.into(),
            Token::Escape("\u{1b}OP".into()),
            'c'.into(),
        ];
        assert_eq!(tokens, expected);
    }
}
