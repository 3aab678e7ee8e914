//! Clock abstraction for deterministic testing.
//!
//! Decouples the hand-off timing from the system clock. Production code uses
//! a wall-clock implementation; tests use virtual time that only moves when
//! the test advances it.

use std::{ops::Sub, time::Duration};

/// Monotonic time source.
///
/// # Invariants
///
/// - `now()` never goes backwards within one execution.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Instant type. `std::time::Instant` in production, virtual time in
    /// tests.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;
}
