//! Bounded retry with a fixed pause between attempts.

use crate::error::ProviderError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, the first one included.
    pub max_attempts: u32,
    /// Pause between two attempts. There is no pause after the last one.
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Create a retry configuration with the given attempt budget.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set the pause between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// A single attempt, no retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }
}

/// Runs an operation until it succeeds, fails terminally, or the attempt
/// budget is spent.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy with the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute an operation with retry logic.
    ///
    /// The closure receives the 1-based attempt number. Errors for which
    /// [`ProviderError::is_retryable`] is false are returned immediately;
    /// otherwise the last error is returned once the budget is spent.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retry");
                    }
                    return Ok(result);
                }
                Err(error) if !error.is_retryable() => return Err(error),
                Err(error) if attempt >= max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        error = %error,
                        "operation failed after all attempts"
                    );
                    return Err(error);
                }
                Err(error) => {
                    debug!(
                        attempt,
                        backoff_ms = self.config.backoff.as_millis() as u64,
                        error = %error,
                        "retrying operation after backoff"
                    );
                    tokio::time::sleep(self.config.backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BucketError, SendError};
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn retryable() -> ProviderError {
        ProviderError::Bucket(BucketError::unexpected_status("op", "do", "b", 500, b"boom"))
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff, Duration::from_secs(2));
        assert_eq!(RetryConfig::no_retry().max_attempts, 1);
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let policy = RetryPolicy::default();
        let result = policy.execute(|_| async { Ok::<_, ProviderError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_budget_with_fixed_pauses() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), _> = policy
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(retryable()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_later_attempt() {
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let result = policy
            .execute(|attempt| async move {
                if attempt < 2 {
                    Err(retryable())
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_immediately() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), _> = policy
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ProviderError::Send(SendError::Transport {
                        message: "refused".into(),
                    }))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
