//! Fuzz target for the keystroke decoder
//!
//! Drives one decoder through an arbitrary stream of byte chunks and resets,
//! the way a listener sees a noisy terminal.
//!
//! # Invariants
//!
//! - NEVER panic on any byte stream
//! - Pending bytes stay within one UTF-8 sequence after any non-digit byte
//! - Pending bytes never exceed the longest CSI candidate
//! - Escape tokens are ASCII and start with ESC
//! - Reset always clears the pending buffer

#![no_main]

use arbitrary::Arbitrary;
use keytap_core::{
    Decoder, Token,
    decoder::{MAX_PENDING_LEN, MAX_UTF8_LEN},
    token::ESC,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Feed(Vec<u8>),
    Reset,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut decoder = Decoder::new();

    for op in ops {
        match op {
            Op::Feed(bytes) => {
                for byte in bytes {
                    if let Some(token) = decoder.feed(byte) {
                        check_token(&token);
                    }
                    assert!(decoder.pending_len() <= MAX_PENDING_LEN);
                    if !byte.is_ascii_digit() {
                        assert!(
                            decoder.pending_len() <= MAX_UTF8_LEN,
                            "pending grew to {} after byte {byte:#04x}",
                            decoder.pending_len()
                        );
                    }
                }
            },
            Op::Reset => {
                decoder.reset();
                assert!(!decoder.is_pending());
            },
        }
    }
});

fn check_token(token: &Token) {
    if let Token::Escape(seq) = token {
        assert!(seq.is_ascii(), "non-ASCII escape token {seq:?}");
        assert_eq!(seq.as_bytes().first(), Some(&ESC));
        assert!(seq.len() >= 2);
    }
}
