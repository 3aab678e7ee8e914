//! Background listener loop.
//!
//! Owns a [`ByteSource`] and a [`Decoder`] on a dedicated thread. Each
//! iteration waits up to one poll interval for input, feeds any byte to the
//! decoder and publishes completed tokens to the [`Handoff`]. The loop ends
//! when the stop signal is set, the input closes, or the source fails.
//!
//! Raw mode is held by a scoped guard for the whole loop: it is restored on
//! every exit path, including source errors and panics, before the thread
//! finishes.

use std::{
    ops::{Deref, DerefMut},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use keytap_core::{Clock, Decoder};

use crate::{
    ByteSource,
    error::{ListenerError, SourceError},
    handoff::Handoff,
};

/// Name of the listener thread.
pub const THREAD_NAME: &str = "keytap-listener";

/// Handle to a running listener thread.
///
/// Dropping the handle stops and joins the thread.
#[derive(Debug)]
pub struct Listener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Listener {
    /// Start listening on `source`, publishing tokens into `handoff`.
    ///
    /// # Errors
    ///
    /// - `ListenerError::Spawn` if the OS refuses to create the thread
    pub fn spawn<S, C>(
        source: S,
        handoff: Handoff<C>,
        poll_interval: Duration,
    ) -> Result<Self, ListenerError>
    where
        S: ByteSource,
        C: Clock,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(source, &handoff, &thread_stop, poll_interval))
            .map_err(ListenerError::Spawn)?;

        Ok(Self { stop, handle: Some(handle) })
    }

    /// Whether the listener thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the loop to stop and wait for the thread to exit.
    ///
    /// Returns once the source's prior mode has been restored. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("listener thread panicked");
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Thread body.
fn run<S, C>(mut source: S, handoff: &Handoff<C>, stop: &AtomicBool, poll_interval: Duration)
where
    S: ByteSource,
    C: Clock,
{
    tracing::debug!(?poll_interval, "listener started");

    let result = match RawModeGuard::acquire(&mut source) {
        Ok(mut guard) => pump(&mut *guard, handoff, stop, poll_interval),
        Err(e) => Err(e),
    };

    // Guard is gone: prior mode already restored
    match result {
        Ok(()) => tracing::debug!("listener stopped"),
        Err(e) if e.is_terminal_mode() => {
            tracing::warn!(error = %e, "listener could not switch terminal mode");
        },
        Err(e) => tracing::warn!(error = %e, "listener stopped on source error"),
    }
}

/// Poll, read and decode until stopped or the input closes.
fn pump<S, C>(
    source: &mut S,
    handoff: &Handoff<C>,
    stop: &AtomicBool,
    poll_interval: Duration,
) -> Result<(), SourceError>
where
    S: ByteSource,
    C: Clock,
{
    let mut decoder = Decoder::new();

    while !stop.load(Ordering::Acquire) {
        if !source.poll_available(poll_interval)? {
            continue;
        }

        let Some(byte) = source.read_byte()? else {
            tracing::debug!("input closed");
            return Ok(());
        };

        if let Some(token) = decoder.feed(byte) {
            tracing::trace!(?token, "decoded keystroke");
            if let Some(displaced) = handoff.put(token) {
                tracing::debug!(?displaced, "unclaimed keystroke overwritten");
            }
        }
    }

    if decoder.is_pending() {
        tracing::debug!(pending = decoder.pending_len(), "dropping partial sequence on stop");
    }
    Ok(())
}

/// Raw mode held for the guard's lifetime.
struct RawModeGuard<'a, S: ByteSource> {
    source: &'a mut S,
    prior: Option<S::Mode>,
}

impl<'a, S: ByteSource> RawModeGuard<'a, S> {
    fn acquire(source: &'a mut S) -> Result<Self, SourceError> {
        let prior = source.set_raw_mode()?;
        Ok(Self { source, prior: Some(prior) })
    }
}

impl<S: ByteSource> Deref for RawModeGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.source
    }
}

impl<S: ByteSource> DerefMut for RawModeGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.source
    }
}

impl<S: ByteSource> Drop for RawModeGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            if let Err(e) = self.source.restore_mode(prior) {
                tracing::warn!(error = %e, "failed to restore terminal mode");
            }
        }
    }
}
