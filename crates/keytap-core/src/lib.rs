//! Keystroke decoding core for keytap
//!
//! Pure state machines for turning a raw terminal byte stream into logical
//! keystrokes. Nothing in this crate performs I/O, spawns threads or reads the
//! clock: time is passed in as a parameter, which keeps every component
//! deterministic and directly testable.
//!
//! # Components
//!
//! - [`Decoder`]: byte stream to [`Token`] stream (ASCII, UTF-8, CSI/SS3)
//! - [`HandoffSlot`]: single-slot mailbox with a maximum unclaimed lifetime
//! - [`Clock`]: time source abstraction (real or virtual)
//! - [`ReaderConfig`]: tunables shared by the listener and the reader

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clock;
pub mod config;
pub mod decoder;
pub mod error;
pub mod handoff;
pub mod keys;
pub mod token;

pub use clock::Clock;
pub use config::ReaderConfig;
pub use decoder::Decoder;
pub use error::ConfigError;
pub use handoff::HandoffSlot;
pub use keys::SpecialKey;
pub use token::Token;
