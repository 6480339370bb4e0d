//! Retry stage.

use std::time::Duration;

use async_trait::async_trait;
use backstop_core::RequestDescriptor;
use tracing::debug;

use super::{Next, Stage, StageResult};
use crate::classify::{is_retryable_error, is_retryable_status};

/// Re-issues transiently failed attempts with exponential backoff.
///
/// An attempt fails either by a thrown transport error or by a
/// retry-eligible status code; both go through the same delay-then-retry
/// path. Anything else - a non-retryable cause, or exhausted attempts -
/// propagates the last failure unchanged. The stage never fabricates a
/// success.
///
/// The delay is a tokio timer, not a blocking sleep, so a waiting retry
/// never pins a worker thread.
pub struct RetryStage {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryStage {
    /// Creates the stage. `max_retries` counts re-attempts after the
    /// initial one; attempt `n` waits `base_delay * 2^n`.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        RetryStage {
            max_retries,
            base_delay,
        }
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

#[async_trait]
impl Stage for RetryStage {
    async fn process(&self, request: RequestDescriptor, next: Next<'_>) -> StageResult {
        let mut attempt = 0u32;
        loop {
            let outcome = next.run(request.clone()).await;

            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(error) => is_retryable_error(error),
            };
            if !retryable || attempt >= self.max_retries {
                return outcome;
            }

            let delay = self.backoff_delay(attempt);
            match &outcome {
                Ok(response) => debug!(
                    status = response.status().as_u16(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retryable status, backing off"
                ),
                Err(error) => debug!(
                    error = %error,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retryable transport error, backing off"
                ),
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let stage = RetryStage::new(3, Duration::from_millis(1000));
        assert_eq!(stage.backoff_delay(0), Duration::from_millis(1000));
        assert_eq!(stage.backoff_delay(1), Duration::from_millis(2000));
        assert_eq!(stage.backoff_delay(2), Duration::from_millis(4000));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let stage = RetryStage::new(64, Duration::from_millis(1000));
        let delay = stage.backoff_delay(40);
        assert!(delay >= stage.backoff_delay(31));
    }
}
