//! Shared hand-off buffer between the listener and the reader.
//!
//! Wraps the pure [`HandoffSlot`] in a mutex and pairs it with a [`Clock`].
//! There is exactly one writer (the listener thread) and one reader (the
//! consumer), so a locked single slot is all the synchronisation needed.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use keytap_core::{Clock, HandoffSlot, Token};

/// Clock-driven, thread-safe single-slot mailbox.
pub struct Handoff<C: Clock> {
    slot: Arc<Mutex<HandoffSlot<C::Instant>>>,
    clock: C,
}

impl<C: Clock> Clone for Handoff<C> {
    fn clone(&self) -> Self {
        Self { slot: Arc::clone(&self.slot), clock: self.clock.clone() }
    }
}

impl<C: Clock> Handoff<C> {
    /// Create an empty hand-off whose tokens expire after `max_lifetime`.
    pub fn new(clock: C, max_lifetime: Duration) -> Self {
        let slot = HandoffSlot::new(clock.now(), max_lifetime);
        Self { slot: Arc::new(Mutex::new(slot)), clock }
    }

    /// Overwrite the slot with `token`. Returns the unclaimed token it
    /// replaced, if any.
    pub fn put(&self, token: Token) -> Option<Token> {
        let now = self.clock.now();
        self.lock().put(token, now)
    }

    /// Whether a fresh token is waiting. Discards a stale one first.
    pub fn is_ready(&self) -> bool {
        let now = self.clock.now();
        let mut slot = self.lock();
        log_expired(slot.expire(now));
        slot.is_ready(now)
    }

    /// Take the waiting token if it is still fresh.
    pub fn get(&self) -> Option<Token> {
        let now = self.clock.now();
        let mut slot = self.lock();
        log_expired(slot.expire(now));
        slot.take(now)
    }

    // Poisoning is ignored: slot updates cannot panic midway
    fn lock(&self) -> MutexGuard<'_, HandoffSlot<C::Instant>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_expired(expired: Option<Token>) {
    if let Some(token) = expired {
        tracing::debug!(?token, "discarded stale keystroke");
    }
}
