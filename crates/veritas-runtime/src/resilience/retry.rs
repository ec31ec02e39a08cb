//! Bounded retry with exponential backoff.

use backon::{ExponentialBuilder, Retryable};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Errors that may succeed if the same request is sent again.
pub trait Transient {
    /// Whether a retry is worthwhile.
    fn is_transient(&self) -> bool;
}

/// How often and how patiently an operation is retried.
///
/// The first retry waits `base_delay`, each further retry doubles the wait.
/// No jitter is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,

    /// Delay before the first retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` below 1 is treated as 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.base_delay.saturating_mul(1 << self.max_attempts.min(16)))
            .with_factor(2.0)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts
    /// run out.
    ///
    /// Each failure that is followed by another attempt is logged at WARN
    /// under `label`. The final error is returned unlogged.
    pub async fn run<T, E, F, Fut>(&self, label: &str, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + Display,
    {
        let mut attempt = 0u32;
        let max_attempts = self.max_attempts;

        operation
            .retry(self.backoff())
            .sleep(tokio::time::sleep)
            .when(|err: &E| err.is_transient())
            .notify(|err: &E, delay: Duration| {
                attempt += 1;
                warn!(
                    provider = label,
                    attempt,
                    max_attempts,
                    retry_in = ?delay,
                    error = %err,
                    "Attempt failed, retrying"
                );
            })
            .await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
