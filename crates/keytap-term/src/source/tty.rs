//! POSIX terminal byte source.
//!
//! Input bypasses `std::io::Stdin`'s internal buffer and reads straight from
//! fd 0 so that `poll(2)` and `read(2)` always agree on what is pending.

use std::{
    io::{self, Stdin},
    os::fd::{AsFd, AsRawFd},
    time::Duration,
};

use nix::{
    errno::Errno,
    poll::{PollFd, PollFlags, PollTimeout, poll},
    unistd,
};

use super::{ByteSource, PriorMode, terminal};
use crate::{
    error::{ListenerError, SourceError},
    lease::TerminalLease,
};

/// Stdin of a POSIX terminal.
///
/// Holds the process-wide [`TerminalLease`] for as long as it lives, so a
/// second `TtySource` cannot be opened while this one exists.
#[derive(Debug)]
pub struct TtySource {
    stdin: Stdin,
    _lease: TerminalLease,
}

impl TtySource {
    /// Claim the terminal.
    ///
    /// # Errors
    ///
    /// - `ListenerError::NotATerminal` if stdin is redirected
    /// - `ListenerError::AlreadyActive` if another source holds the lease
    pub fn open() -> Result<Self, ListenerError> {
        let lease = terminal::claim()?;
        Ok(Self { stdin: io::stdin(), _lease: lease })
    }
}

impl ByteSource for TtySource {
    type Mode = PriorMode;

    fn set_raw_mode(&mut self) -> Result<Self::Mode, SourceError> {
        terminal::enter_raw_mode()
    }

    fn restore_mode(&mut self, prior: Self::Mode) -> Result<(), SourceError> {
        terminal::restore_mode(prior)
    }

    fn poll_available(&mut self, timeout: Duration) -> Result<bool, SourceError> {
        let mut fds = [PollFd::new(self.stdin.as_fd(), PollFlags::POLLIN)];

        match poll(&mut fds, PollTimeout::from(poll_millis(timeout))) {
            Ok(0) | Err(Errno::EINTR) => Ok(false),
            Ok(_) => readiness(fds[0].revents()),
            Err(errno) => Err(io::Error::from(errno).into()),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        let mut buf = [0u8; 1];
        loop {
            match unistd::read(self.stdin.as_raw_fd(), &mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(Errno::EINTR) => {},
                Err(errno) => return Err(io::Error::from(errno).into()),
            }
        }
    }
}

/// Poll timeout in whole milliseconds, rounded up.
///
/// A non-zero wait never becomes a zero (non-blocking) poll.
fn poll_millis(timeout: Duration) -> u16 {
    u16::try_from(timeout.as_nanos().div_ceil(1_000_000)).unwrap_or(u16::MAX)
}

/// Map returned poll events to "a read will not block".
fn readiness(revents: Option<PollFlags>) -> Result<bool, SourceError> {
    let revents = revents.unwrap_or(PollFlags::empty());

    // POLLHUP makes the next read return 0, which ends the listener
    if revents.intersects(PollFlags::POLLIN | PollFlags::POLLHUP) {
        return Ok(true);
    }
    // Level-triggered: polling again would report them forever
    if revents.intersects(PollFlags::POLLERR | PollFlags::POLLNVAL) {
        return Err(io::Error::other(format!("stdin poll reported {revents:?}")).into());
    }
    Ok(false)
}
