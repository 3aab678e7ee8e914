//! Keytap terminal runtime.
//!
//! Wraps [`keytap_core`]'s pure decoder and hand-off slot with a real
//! terminal, a background thread and wall-clock time.
//!
//! # Architecture
//!
//! A [`Listener`] thread owns a [`ByteSource`], holds it in raw mode, and
//! feeds every byte it reads to a [`Decoder`](keytap_core::Decoder).
//! Completed tokens go into a [`Handoff`], a mutex-guarded single slot with a
//! maximum lifetime. The consumer's [`KeystrokeReader`] polls that slot.
//!
//! # Components
//!
//! - [`KeystrokeReader`]: blocking consumer API, owns the listener
//! - [`Listener`]: background poll/read/decode loop
//! - [`Handoff`]: thread-safe single-slot mailbox
//! - [`ByteSource`]: terminal abstraction (`TtySource` on POSIX,
//!   `ConsoleSource` on Windows)
//! - [`TerminalLease`]: process-wide claim on the real terminal
//! - [`SystemClock`]: production time source

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod handoff;
mod lease;
mod listener;
mod reader;
pub mod source;
mod system_clock;

pub use error::{ListenerError, SourceError};
pub use handoff::Handoff;
pub use keytap_core::{ReaderConfig, SpecialKey, Token};
pub use lease::TerminalLease;
pub use listener::{Listener, THREAD_NAME};
pub use reader::KeystrokeReader;
pub use source::{ByteSource, open_platform_source};
#[cfg(windows)]
pub use source::ConsoleSource;
#[cfg(any(unix, windows))]
pub use source::PriorMode;
#[cfg(unix)]
pub use source::TtySource;
pub use system_clock::SystemClock;
