//! Error types for keytap configuration.

use std::time::Duration;

use thiserror::Error;

/// Invalid [`ReaderConfig`](crate::ReaderConfig) tunables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The listener would spin without ever waiting for input.
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    /// The reader would never wait between hand-off checks.
    #[error("consumer poll factor must be at least 1")]
    ZeroConsumerFactor,

    /// Tokens would expire before the reader gets a chance to look at them.
    #[error("max lifetime {max_lifetime:?} is shorter than the consumer delay {consumer_delay:?}")]
    LifetimeTooShort {
        /// Configured token lifetime
        max_lifetime: Duration,
        /// Delay between two reader checks
        consumer_delay: Duration,
    },
}
