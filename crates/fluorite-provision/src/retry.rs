//! Bounded exponential-backoff retry
//!
//! Used by the orchestrator's network-error recovery path only; no other
//! failure kind is retried automatically.

use crate::error::{ErrorKind, ProvisionError, Result};
use std::time::Duration;

/// Retry configuration for transient failures
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts made by the helper itself
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds
    pub initial_delay_ms: u64,

    /// Cap on any single delay, in milliseconds
    pub max_delay_ms: u64,

    /// Factor applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay after the given zero-based attempt, capped at `max_delay_ms`.
    /// No jitter: provisioning runs one operation chain at a time, so there
    /// is no thundering herd to spread out.
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        (delay as u64).min(self.max_delay_ms)
    }
}

/// Run `operation` up to `config.max_attempts` times, sleeping between
/// attempts. The last error propagates once the budget is spent.
pub async fn execute_with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 0..config.max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    "attempt {}/{} failed: {}",
                    attempt + 1,
                    config.max_attempts,
                    e
                );
                last_error = Some(e);
            }
        }

        if attempt + 1 < config.max_attempts {
            let delay_ms = config.delay_for_attempt(attempt);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ProvisionError::classified(ErrorKind::Unknown, "retry budget allows no attempts")
    }))
}
