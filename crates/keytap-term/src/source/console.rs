//! Windows console byte source.
//!
//! Reads key events through crossterm and replays each one as the bytes an
//! xterm would send, one byte per [`read_byte`](ByteSource::read_byte).

use std::{collections::VecDeque, time::Duration};

use crossterm::event::{self, Event};

use super::{ByteSource, PriorMode, keymap, terminal};
use crate::{
    error::{ListenerError, SourceError},
    lease::TerminalLease,
};

/// Stdin of a Windows console.
///
/// Holds the process-wide [`TerminalLease`] for as long as it lives.
#[derive(Debug)]
pub struct ConsoleSource {
    /// Encoded bytes of the last key event not yet read
    buffered: VecDeque<u8>,
    _lease: TerminalLease,
}

impl ConsoleSource {
    /// Claim the console.
    ///
    /// # Errors
    ///
    /// - `ListenerError::NotATerminal` if stdin is redirected
    /// - `ListenerError::AlreadyActive` if another source holds the lease
    pub fn open() -> Result<Self, ListenerError> {
        let lease = terminal::claim()?;
        Ok(Self { buffered: VecDeque::new(), _lease: lease })
    }
}

impl ByteSource for ConsoleSource {
    type Mode = PriorMode;

    fn set_raw_mode(&mut self) -> Result<Self::Mode, SourceError> {
        terminal::enter_raw_mode()
    }

    fn restore_mode(&mut self, prior: Self::Mode) -> Result<(), SourceError> {
        terminal::restore_mode(prior)
    }

    fn poll_available(&mut self, timeout: Duration) -> Result<bool, SourceError> {
        if !self.buffered.is_empty() {
            return Ok(true);
        }
        if !event::poll(timeout)? {
            return Ok(false);
        }
        // Resize, focus and mouse events carry no keystroke
        if let Event::Key(key) = event::read()? {
            if let Some(bytes) = keymap::encode(&key) {
                self.buffered.extend(bytes);
            }
        }
        Ok(!self.buffered.is_empty())
    }

    // The console has no end of input: `None` only follows a false poll
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        Ok(self.buffered.pop_front())
    }
}
