//! Process-wide claim on the real terminal.
//!
//! Raw mode is global process state: two listeners restoring it
//! independently would undo each other. Whoever switches the real terminal to
//! raw mode must hold the single [`TerminalLease`] first.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ListenerError;

static TERMINAL_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Exclusive ownership of the process terminal. Released on drop.
#[derive(Debug)]
pub struct TerminalLease {
    _private: (),
}

impl TerminalLease {
    /// Claim the terminal.
    ///
    /// # Errors
    ///
    /// - `ListenerError::AlreadyActive` if a lease is already held
    pub fn acquire() -> Result<Self, ListenerError> {
        TERMINAL_CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ListenerError::AlreadyActive)?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalLease {
    fn drop(&mut self) {
        TERMINAL_CLAIMED.store(false, Ordering::Release);
    }
}
