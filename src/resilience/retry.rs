//! Retry logic with exponential backoff.
//!
//! Respects retry-after hints carried by rate limit and availability errors and
//! otherwise backs off exponentially with jitter.

use std::time::Duration;
use tokio::time::sleep;
use crate::error::SurveyorError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (e.g., 2.0 for doubling).
    pub multiplier: f64,
    /// Jitter factor (0.0 to 1.0) to add randomness to delays.
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryConfig {
    /// Creates a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

/// Executes operations with retry logic and exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Creates a new retry executor with the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Executes an operation, retrying while the error is retryable and
    /// attempts remain.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, SurveyorError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, SurveyorError>>,
    {
        let mut attempts = 0;
        let mut delay = self.config.initial_delay;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempts > 0 {
                        tracing::info!(attempts, "Operation succeeded after retries");
                    }
                    return Ok(result);
                }
                Err(e) if e.is_retryable() && attempts < self.config.max_retries => {
                    attempts += 1;

                    let wait_duration = e.retry_after().unwrap_or(delay);
                    let jittered = self.add_jitter(wait_duration);

                    tracing::warn!(
                        attempt = attempts,
                        max_retries = self.config.max_retries,
                        error = %e,
                        wait = ?jittered,
                        "Retryable error encountered"
                    );

                    sleep(jittered).await;

                    delay = std::cmp::min(
                        Duration::from_secs_f64(delay.as_secs_f64() * self.config.multiplier),
                        self.config.max_delay,
                    );
                }
                Err(e) => {
                    if attempts > 0 {
                        tracing::error!(attempts, error = %e, "Operation failed after retries");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Adds +/- jitter to a duration using a hash of the current time.
    fn add_jitter(&self, duration: Duration) -> Duration {
        use std::collections::hash_map::RandomState;
        use std::hash::{BuildHasher, Hash, Hasher};

        let mut hasher = RandomState::new().build_hasher();
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
            .hash(&mut hasher);

        let random_factor = (hasher.finish() % 10_000) as f64 / 10_000.0;
        let jitter_range = duration.as_secs_f64() * self.config.jitter;
        let jitter = random_factor * jitter_range * 2.0 - jitter_range;

        Duration::from_secs_f64((duration.as_secs_f64() + jitter).max(0.0))
    }

    /// Returns the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, NetworkError, RateLimitError};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_eventually() {
        let executor = RetryExecutor::new(fast_config(3));
        let attempts = Arc::new(AtomicU32::new(0));

        let result = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(SurveyorError::Network(NetworkError::Timeout {
                            duration: Duration::from_secs(10),
                        }))
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let executor = RetryExecutor::new(fast_config(2));
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(SurveyorError::Network(NetworkError::ConnectionFailed {
                        message: "refused".to_string(),
                    }))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3); // initial attempt + 2 retries
    }

    #[tokio::test]
    async fn test_non_retryable_error() {
        let executor = RetryExecutor::new(fast_config(3));
        let attempts = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(SurveyorError::Configuration(ConfigurationError::MissingApiKey))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_after_is_respected() {
        let executor = RetryExecutor::new(fast_config(2));
        let attempts = Arc::new(AtomicU32::new(0));

        let start = std::time::Instant::now();
        let result = executor
            .execute(|| {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 1 {
                        Err(SurveyorError::RateLimit(RateLimitError::TooManyRequests {
                            retry_after: Some(Duration::from_millis(50)),
                        }))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        // 50ms minus at most 10% jitter
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_add_jitter_bounds() {
        let executor = RetryExecutor::new(RetryConfig::default());
        let jittered = executor.add_jitter(Duration::from_secs(10));

        assert!(jittered >= Duration::from_secs(9));
        assert!(jittered <= Duration::from_secs(11));
    }

    #[test]
    fn test_no_retry_config() {
        assert_eq!(RetryConfig::no_retry().max_retries, 0);
    }
}
