//! Single-slot hand-off with staleness protection.
//!
//! The slot sits between the listener (one writer) and the reader (one
//! reader). It never queues: a new token overwrites whatever is there, and a
//! token nobody claims within the max lifetime is discarded instead of being
//! replayed after a UI transition.
//!
//! Time is passed in on every call so the slot stays pure and can run on
//! virtual time in tests.

use std::{ops::Sub, time::Duration};

use crate::token::Token;

/// Single-token mailbox with lazy expiry.
///
/// # Invariants
///
/// - Holds either nothing or exactly one token.
/// - Freshness is only evaluated on access (`is_ready`, `take`), never
///   eagerly.
#[derive(Debug, Clone)]
pub struct HandoffSlot<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Pending token, if any
    token: Option<Token>,
    /// Last insertion (or expiry/claim) timestamp
    stamped_at: I,
    /// Maximum unclaimed lifetime
    max_lifetime: Duration,
}

impl<I> HandoffSlot<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create an empty slot.
    pub fn new(now: I, max_lifetime: Duration) -> Self {
        Self { token: None, stamped_at: now, max_lifetime }
    }

    /// Store `token`, replacing any unclaimed one, and restart its lifetime.
    ///
    /// Returns the token that was displaced, if one was still waiting.
    pub fn put(&mut self, token: Token, now: I) -> Option<Token> {
        self.stamped_at = now;
        self.token.replace(token)
    }

    /// Whether a fresh token is waiting.
    ///
    /// Clears the slot first if the stored token outlived `max_lifetime`.
    pub fn is_ready(&mut self, now: I) -> bool {
        self.expire(now);
        self.token.is_some()
    }

    /// Remove and return the waiting token if it is still fresh.
    pub fn take(&mut self, now: I) -> Option<Token> {
        self.expire(now);
        let token = self.token.take();
        if token.is_some() {
            self.stamped_at = now;
        }
        token
    }

    /// Drop the stored token if it is stale. Returns the dropped token.
    pub fn expire(&mut self, now: I) -> Option<Token> {
        if now > self.stamped_at && now - self.stamped_at > self.max_lifetime {
            self.stamped_at = now;
            return self.token.take();
        }
        None
    }
}
