//! Chaotic byte source wrapper for fault injection testing
//!
//! Delegates to an inner source but randomly fails polls and reads. Mode
//! transitions always pass through so tests can check the terminal was put
//! back after the listener gave up.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use keytap_term::{ByteSource, SourceError};

/// Seed used by [`ChaoticSource::new`].
pub const DEFAULT_SEED: u64 = 0x1234_5678_9ABC_DEF0;

/// Byte source that randomly injects I/O failures.
#[derive(Debug)]
pub struct ChaoticSource<S: ByteSource> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    rng: ChaoticRng,
    stats: ChaosStats,
}

/// Counters observable after the source has moved into the listener.
#[derive(Debug, Clone, Default)]
pub struct ChaosStats {
    operations: Arc<AtomicUsize>,
    injected: Arc<AtomicUsize>,
}

impl ChaosStats {
    /// Poll and read calls attempted.
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::Acquire)
    }

    /// Failures injected.
    pub fn injected(&self) -> usize {
        self.injected.load(Ordering::Acquire)
    }
}

/// Linear congruential generator, reproducible for a given seed.
#[derive(Debug)]
struct ChaoticRng {
    state: u64,
}

impl ChaoticRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next value in [0.0, 1.0)
    fn next(&mut self) -> f64 {
        // Numerical Recipes constants
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }
}

impl<S: ByteSource> ChaoticSource<S> {
    /// Wrap `inner` with the default seed.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, DEFAULT_SEED)
    }

    /// Wrap `inner` with an explicit seed for reproducible chaos.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self { inner, failure_rate, rng: ChaoticRng::new(seed), stats: ChaosStats::default() }
    }

    /// Shared counters for this source.
    pub fn stats(&self) -> ChaosStats {
        self.stats.clone()
    }

    fn roll(&mut self, operation: &'static str) -> Result<(), SourceError> {
        self.stats.operations.fetch_add(1, Ordering::AcqRel);
        if self.rng.next() < self.failure_rate {
            self.stats.injected.fetch_add(1, Ordering::AcqRel);
            tracing::debug!(operation, "injecting source failure");
            return Err(io::Error::other("chaotic failure injection").into());
        }
        Ok(())
    }
}

impl<S: ByteSource> ByteSource for ChaoticSource<S> {
    type Mode = S::Mode;

    fn set_raw_mode(&mut self) -> Result<Self::Mode, SourceError> {
        self.inner.set_raw_mode()
    }

    fn restore_mode(&mut self, prior: Self::Mode) -> Result<(), SourceError> {
        self.inner.restore_mode(prior)
    }

    fn poll_available(&mut self, timeout: Duration) -> Result<bool, SourceError> {
        self.roll("poll")?;
        self.inner.poll_available(timeout)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        self.roll("read")?;
        self.inner.read_byte()
    }
}
