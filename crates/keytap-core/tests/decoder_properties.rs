//! Property-based tests for the escape-sequence decoder
//!
//! These tests verify the decoding contract for ALL inputs of a family, not
//! just hand-picked examples: ASCII passes through one token per byte, UTF-8
//! characters surface only on their final byte, and arbitrary garbage never
//! grows the pending buffer past its bounds.

use keytap_core::{
    Decoder, Token,
    decoder::{MAX_PENDING_LEN, MAX_UTF8_LEN},
};
use proptest::prelude::*;

/// Strategy for ASCII bytes other than ESC
fn plain_ascii() -> impl Strategy<Value = u8> {
    (0u8..0x80).prop_filter("ESC opens a sequence", |b| *b != 0x1B)
}

/// Strategy for characters that need more than one UTF-8 byte
fn multibyte_char() -> impl Strategy<Value = char> {
    any::<char>().prop_filter("multi-byte only", |c| c.len_utf8() > 1)
}

/// Strategy for complete CSI/SS3 sequences the decoder recognises
fn escape_sequence() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        // ESC O <ascii>
        (0u8..0x80)
            .prop_filter("ESC restarts", |b| *b != 0x1B)
            .prop_map(|b| vec![0x1B, b'O', b]),
        // ESC [ <letter>
        prop::sample::select(b"ABCDHFZ".to_vec()).prop_map(|b| vec![0x1B, b'[', b]),
        // ESC [ <1-8> <0-9>* ~
        (b'1'..=b'8', prop::collection::vec(b'0'..=b'9', 0..4)).prop_map(|(first, rest)| {
            let mut seq = vec![0x1B, b'[', first];
            seq.extend(rest);
            seq.push(b'~');
            seq
        }),
    ]
}

#[test]
fn prop_ascii_emits_one_token_per_byte() {
    proptest!(|(bytes in prop::collection::vec(plain_ascii(), 0..256))| {
        let tokens = Decoder::new().feed_all(&bytes);

        // PROPERTY: one token per byte, same character, same order
        let expected: Vec<Token> = bytes.iter().map(|&b| Token::Char(char::from(b))).collect();
        prop_assert_eq!(tokens, expected);
    });
}

#[test]
fn prop_utf8_emits_only_on_final_byte() {
    proptest!(|(c in multibyte_char())| {
        let mut buf = [0u8; 4];
        let bytes = c.encode_utf8(&mut buf).as_bytes();
        let (last, prefix) = bytes.split_last().expect("multi-byte char has bytes");

        let mut decoder = Decoder::new();
        for &b in prefix {
            // PROPERTY: partial prefix never emits
            prop_assert_eq!(decoder.feed(b), None);
            prop_assert!(decoder.is_pending());
        }

        // PROPERTY: final byte emits exactly the decoded character
        prop_assert_eq!(decoder.feed(*last), Some(Token::Char(c)));
        prop_assert!(!decoder.is_pending());
    });
}

#[test]
fn prop_escape_sequences_emit_single_token() {
    proptest!(|(seq in escape_sequence())| {
        let tokens = Decoder::new().feed_all(&seq);

        prop_assert_eq!(tokens.len(), 1, "sequence {:?} should emit one token", seq);
        prop_assert_eq!(tokens[0].to_bytes(), seq.clone());
        prop_assert!(tokens[0].is_escape());
    });
}

#[test]
fn prop_text_round_trips_through_decoder() {
    // Any string without ESC decodes to its characters, in order
    proptest!(|(text in "[^\u{1b}]{0,64}")| {
        let tokens = Decoder::new().feed_all(text.as_bytes());
        let expected: Vec<Token> = text.chars().map(Token::Char).collect();
        prop_assert_eq!(tokens, expected);
    });
}

#[test]
fn prop_non_digit_bytes_keep_pending_bounded() {
    // Without parameter digits no candidate can outgrow the UTF-8 window
    let non_digit = any::<u8>().prop_filter("no CSI parameters", |b| !b.is_ascii_digit());
    proptest!(|(bytes in prop::collection::vec(non_digit, 0..512))| {
        let mut decoder = Decoder::new();
        for b in bytes {
            let _ = decoder.feed(b);
            prop_assert!(
                decoder.pending_len() <= MAX_UTF8_LEN,
                "pending buffer grew to {}",
                decoder.pending_len()
            );
        }
    });
}

#[test]
fn prop_high_bytes_never_exceed_utf8_window() {
    proptest!(|(bytes in prop::collection::vec(0x80u8..=0xFF, 0..256))| {
        let mut decoder = Decoder::new();
        for b in bytes {
            let _ = decoder.feed(b);
            // PROPERTY: bounded self-correction
            prop_assert!(decoder.pending_len() <= MAX_UTF8_LEN);
        }
    });
}

#[test]
fn prop_pending_is_bounded_for_any_stream() {
    let byte = prop_oneof![any::<u8>(), b'0'..=b'9', Just(0x1B), Just(b'[')];
    proptest!(|(bytes in prop::collection::vec(byte, 0..512))| {
        let mut decoder = Decoder::new();
        for b in bytes {
            let _ = decoder.feed(b);
            // PROPERTY: no input grows the buffer without limit
            prop_assert!(decoder.pending_len() <= MAX_PENDING_LEN);
        }
    });
}

#[test]
fn prop_sequence_survives_surrounding_text() {
    proptest!(|(
        before in prop::collection::vec(plain_ascii(), 0..16),
        seq in escape_sequence(),
        after in prop::collection::vec(plain_ascii(), 0..16)
    )| {
        let mut input = before.clone();
        input.extend(&seq);
        input.extend(&after);

        let tokens = Decoder::new().feed_all(&input);

        // PROPERTY: text before and after is untouched, sequence stays whole
        prop_assert_eq!(tokens.len(), before.len() + 1 + after.len());
        prop_assert_eq!(tokens[before.len()].to_bytes(), seq);
    });
}
