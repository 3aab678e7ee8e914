//! Error types for the terminal listener.
//!
//! Two layers: [`SourceError`] for failures inside a byte source (raw mode,
//! poll, read) and [`ListenerError`] for failures constructing a reader.
//! Source errors raised after the listener is running are logged by the
//! listener thread and never reach the consumer.

use std::io;

use keytap_core::ConfigError;
use thiserror::Error;

/// Errors raised by a [`ByteSource`](crate::ByteSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// I/O error polling or reading input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Switching the terminal into or out of raw mode failed.
    #[error("terminal mode error during {operation}: {source}")]
    TerminalMode {
        /// Mode operation that failed
        operation: &'static str,
        /// Underlying error
        source: io::Error,
    },
}

impl SourceError {
    /// Build a terminal mode error for `operation`.
    pub fn terminal_mode(operation: &'static str, source: io::Error) -> Self {
        Self::TerminalMode { operation, source }
    }

    /// Returns true if this error came from a raw mode transition.
    pub fn is_terminal_mode(&self) -> bool {
        matches!(self, Self::TerminalMode { .. })
    }
}

/// Errors constructing a keystroke reader.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// No byte source implementation exists for this host.
    #[error("no raw terminal input implementation for this platform")]
    UnsupportedPlatform,

    /// Standard input is not attached to a terminal.
    #[error("stdin is not a terminal")]
    NotATerminal,

    /// Another listener already owns the terminal.
    #[error("another keystroke listener already owns the terminal")]
    AlreadyActive,

    /// Invalid tunables.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Opening the byte source failed.
    #[error("byte source error: {0}")]
    Source(#[from] SourceError),

    /// The listener thread could not be spawned.
    #[error("failed to spawn listener thread: {0}")]
    Spawn(#[source] io::Error),
}
