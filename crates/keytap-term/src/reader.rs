//! Blocking keystroke reader.
//!
//! [`KeystrokeReader`] is the consumer-facing half: constructing one starts
//! the listener thread, reading blocks until a fresh token shows up in the
//! hand-off, and dropping it stops the listener and restores the terminal.

use std::{thread, time::Duration};

use keytap_core::{Clock, ReaderConfig, Token};

use crate::{
    ByteSource,
    error::ListenerError,
    handoff::Handoff,
    listener::Listener,
    source::open_platform_source,
    system_clock::SystemClock,
};

/// Reads one decoded keystroke at a time from a background listener.
///
/// # Example
///
/// ```no_run
/// use keytap_term::KeystrokeReader;
///
/// let reader = KeystrokeReader::start()?;
/// let key = reader.read_keystroke();
/// if key == "q" {
///     // quit
/// }
/// # Ok::<(), keytap_term::ListenerError>(())
/// ```
pub struct KeystrokeReader<C: Clock = SystemClock> {
    handoff: Handoff<C>,
    listener: Listener,
    consumer_delay: Duration,
}

impl KeystrokeReader<SystemClock> {
    /// Listen on the process terminal with default tunables.
    ///
    /// # Errors
    ///
    /// See [`with_config`](Self::with_config).
    pub fn start() -> Result<Self, ListenerError> {
        Self::with_config(ReaderConfig::default())
    }

    /// Listen on the process terminal.
    ///
    /// # Errors
    ///
    /// - `ListenerError::Config` if `config` fails validation
    /// - `ListenerError::UnsupportedPlatform` on hosts without a terminal
    ///   source
    /// - `ListenerError::NotATerminal` if stdin is redirected
    /// - `ListenerError::AlreadyActive` if another reader owns the terminal
    /// - `ListenerError::Spawn` if the listener thread cannot be created
    pub fn with_config(config: ReaderConfig) -> Result<Self, ListenerError> {
        config.validate()?;
        let source = open_platform_source()?;
        Self::with_source(source, SystemClock::new(), config)
    }
}

impl<C: Clock> KeystrokeReader<C> {
    /// Listen on an arbitrary byte source, reading time from `clock`.
    ///
    /// # Errors
    ///
    /// - `ListenerError::Config` if `config` fails validation
    /// - `ListenerError::Spawn` if the listener thread cannot be created
    pub fn with_source<S>(source: S, clock: C, config: ReaderConfig) -> Result<Self, ListenerError>
    where
        S: ByteSource,
    {
        config.validate()?;

        let handoff = Handoff::new(clock, config.max_lifetime);
        let listener = Listener::spawn(source, handoff.clone(), config.poll_interval)?;

        tracing::debug!(?config, "keystroke reader started");
        Ok(Self { handoff, listener, consumer_delay: config.consumer_delay() })
    }

    /// Block until the next fresh keystroke arrives.
    ///
    /// Never returns without a token. If the listener has stopped (input
    /// closed or source failure) this waits forever; check
    /// [`is_listening`](Self::is_listening) when that matters.
    pub fn read_keystroke(&self) -> Token {
        loop {
            if let Some(token) = self.handoff.get() {
                return token;
            }
            thread::sleep(self.consumer_delay);
        }
    }

    /// Take a waiting keystroke without blocking.
    pub fn try_read_keystroke(&self) -> Option<Token> {
        self.handoff.get()
    }

    /// Wait up to roughly `timeout` for a keystroke.
    ///
    /// The wait is a sum of consumer-delay naps, not a clock deadline.
    pub fn read_keystroke_timeout(&self, timeout: Duration) -> Option<Token> {
        let mut remaining = timeout;
        loop {
            if let Some(token) = self.handoff.get() {
                return Some(token);
            }
            if remaining.is_zero() {
                return None;
            }
            let nap = remaining.min(self.consumer_delay);
            thread::sleep(nap);
            remaining -= nap;
        }
    }

    /// Whether the listener thread is still running.
    pub fn is_listening(&self) -> bool {
        self.listener.is_running()
    }

    /// Stop the listener and restore the terminal mode.
    ///
    /// Dropping the reader does the same. Idempotent.
    pub fn stop(&mut self) {
        self.listener.stop();
    }
}

impl<C: Clock> std::fmt::Debug for KeystrokeReader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystrokeReader")
            .field("listener", &self.listener)
            .field("consumer_delay", &self.consumer_delay)
            .finish_non_exhaustive()
    }
}
