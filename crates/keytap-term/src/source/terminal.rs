//! Terminal claim and raw mode switching shared by the platform sources.
//!
//! Raw mode goes through crossterm, which remembers the original terminal
//! settings and puts them back on disable.

use std::io::{self, IsTerminal};

use crossterm::terminal;

use crate::{
    error::{ListenerError, SourceError},
    lease::TerminalLease,
};

/// Terminal state before a platform source entered raw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorMode {
    /// Raw mode was already on (owned by someone else); leave it on.
    was_raw: bool,
}

/// Check stdin is interactive and take the process-wide lease.
pub(crate) fn claim() -> Result<TerminalLease, ListenerError> {
    if !io::stdin().is_terminal() {
        return Err(ListenerError::NotATerminal);
    }
    TerminalLease::acquire()
}

pub(crate) fn enter_raw_mode() -> Result<PriorMode, SourceError> {
    let was_raw =
        terminal::is_raw_mode_enabled().map_err(|e| SourceError::terminal_mode("query", e))?;
    if !was_raw {
        terminal::enable_raw_mode().map_err(|e| SourceError::terminal_mode("enable", e))?;
    }
    Ok(PriorMode { was_raw })
}

pub(crate) fn restore_mode(prior: PriorMode) -> Result<(), SourceError> {
    if prior.was_raw {
        return Ok(());
    }
    terminal::disable_raw_mode().map_err(|e| SourceError::terminal_mode("restore", e))
}
