//! Retry policy for transient upstream failures.

use std::{future::Future, time::Duration};

use rand::Rng;
use tracing::{debug, warn};

use crate::error::GatewayResult;

/// Exponential backoff with additive jitter.
///
/// delay(attempt) = base_delay * 2^attempt + uniform(0, max_jitter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts. Used by tests.
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Backoff before the attempt following `attempt` (attempts count from 1).
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.min(63));
        let base = (self.base_delay.as_millis() as u64).saturating_mul(factor);
        let jitter_cap = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_cap == 0 {
            0
        } else {
            rand::rng().random_range(0..jitter_cap)
        };
        Duration::from_millis(base.saturating_add(jitter))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<F, Fut, T>(&self, label: &str, mut op: F) -> GatewayResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        endpoint = label,
                        attempt,
                        status = e.status(),
                        delay_ms = delay.as_millis() as u64,
                        "Transient upstream failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(endpoint = label, attempt, error = %e, "Giving up on request");
                    return Err(e);
                }
            }
        }
    }
}
