//! Raw byte sources.
//!
//! The [`ByteSource`] trait decouples the listener loop from the platform's
//! terminal control. Each platform provides one implementation; tests drive
//! the same listener with scripted sources.
//!
//! # Implementations
//!
//! - **POSIX**: [`TtySource`], crossterm raw mode plus `poll(2)`/`read(2)` on
//!   stdin
//! - **Windows**: `ConsoleSource`, crossterm key events re-encoded as xterm
//!   bytes
//! - **Simulation**: scripted and chaotic sources in `keytap-harness`

#[cfg(windows)]
mod console;
#[cfg(any(windows, test))]
mod keymap;
#[cfg(any(unix, windows))]
mod terminal;
#[cfg(unix)]
mod tty;

use std::time::Duration;

#[cfg(windows)]
pub use console::ConsoleSource;
#[cfg(any(unix, windows))]
pub use terminal::PriorMode;
#[cfg(unix)]
pub use tty::TtySource;

use crate::error::{ListenerError, SourceError};

/// Platform byte source consumed by the listener loop.
///
/// # Contract
///
/// - `set_raw_mode` is called once, before any poll or read, and its result
///   is handed back to `restore_mode` exactly once on every exit path.
/// - `poll_available` must return within roughly `timeout` so the listener can
///   observe its stop signal.
/// - `read_byte` is only called after `poll_available` returned `true` and
///   must not block in that case.
pub trait ByteSource: Send + 'static {
    /// Terminal state captured before switching to raw mode.
    type Mode: Send;

    /// Switch to unbuffered, non-echoing input and return the prior mode.
    fn set_raw_mode(&mut self) -> Result<Self::Mode, SourceError>;

    /// Restore the mode captured by [`set_raw_mode`](Self::set_raw_mode).
    fn restore_mode(&mut self, prior: Self::Mode) -> Result<(), SourceError>;

    /// Wait up to `timeout` for input. Returns whether a byte can be read.
    fn poll_available(&mut self, timeout: Duration) -> Result<bool, SourceError>;

    /// Read one byte. `None` means the input is closed.
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError>;
}

/// Open the terminal byte source for this platform.
///
/// # Errors
///
/// - `ListenerError::NotATerminal` if stdin is not a TTY
/// - `ListenerError::AlreadyActive` if another listener owns the terminal
#[cfg(unix)]
pub fn open_platform_source() -> Result<TtySource, ListenerError> {
    TtySource::open()
}

/// Open the terminal byte source for this platform.
///
/// # Errors
///
/// - `ListenerError::NotATerminal` if stdin is not a console
/// - `ListenerError::AlreadyActive` if another listener owns the console
#[cfg(windows)]
pub fn open_platform_source() -> Result<ConsoleSource, ListenerError> {
    ConsoleSource::open()
}

/// Open the terminal byte source for this platform.
///
/// # Errors
///
/// Always `ListenerError::UnsupportedPlatform`: this host has no raw byte
/// source.
#[cfg(not(any(unix, windows)))]
pub fn open_platform_source() -> Result<Unsupported, ListenerError> {
    Err(ListenerError::UnsupportedPlatform)
}

/// Placeholder source for hosts without an implementation. Cannot be built.
#[cfg(not(any(unix, windows)))]
#[derive(Debug)]
pub enum Unsupported {}

#[cfg(not(any(unix, windows)))]
impl ByteSource for Unsupported {
    type Mode = ();

    fn set_raw_mode(&mut self) -> Result<Self::Mode, SourceError> {
        match *self {}
    }

    fn restore_mode(&mut self, _prior: Self::Mode) -> Result<(), SourceError> {
        match *self {}
    }

    fn poll_available(&mut self, _timeout: Duration) -> Result<bool, SourceError> {
        match *self {}
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        match *self {}
    }
}
