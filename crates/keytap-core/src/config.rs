//! Listener and reader tunables.

use std::time::Duration;

use crate::error::ConfigError;

/// Time between two terminal availability checks in the listener.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Time before an unclaimed token is discarded from the hand-off slot.
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_millis(500);

/// Reader delay between hand-off checks, as a multiple of the poll interval.
pub const DEFAULT_CONSUMER_POLL_FACTOR: u32 = 2;

/// Keystroke reader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Bounded wait of one listener availability poll
    pub poll_interval: Duration,
    /// Maximum unclaimed lifetime of a token in the hand-off slot
    pub max_lifetime: Duration,
    /// Reader sleep between checks = `poll_interval * consumer_poll_factor`
    pub consumer_poll_factor: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_lifetime: DEFAULT_MAX_LIFETIME,
            consumer_poll_factor: DEFAULT_CONSUMER_POLL_FACTOR,
        }
    }
}

impl ReaderConfig {
    /// Delay the reader sleeps between two empty hand-off checks.
    pub fn consumer_delay(&self) -> Duration {
        self.poll_interval.saturating_mul(self.consumer_poll_factor)
    }

    /// Check the tunables are usable together.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ZeroPollInterval` if `poll_interval` is zero
    /// - `ConfigError::ZeroConsumerFactor` if `consumer_poll_factor` is zero
    /// - `ConfigError::LifetimeTooShort` if a token could expire between two
    ///   reader checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.consumer_poll_factor == 0 {
            return Err(ConfigError::ZeroConsumerFactor);
        }
        let consumer_delay = self.consumer_delay();
        if self.max_lifetime < consumer_delay {
            return Err(ConfigError::LifetimeTooShort {
                max_lifetime: self.max_lifetime,
                consumer_delay,
            });
        }
        Ok(())
    }
}
