use pixelfeed_core::{CoreError, ErrorExt};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Retry config tuned for the Hacker News Firebase API: unauthenticated
    /// and generous, so short delays are enough.
    pub fn hacker_news() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.2, // jitter to avoid thundering herd on page fetches
        }
    }

    /// Backoff delay before the next attempt. `attempt` is 1-based.
    pub fn delay_for_attempt(&self, attempt: u32, suggested: Option<Duration>) -> Duration {
        if let Some(suggested) = suggested {
            return suggested.min(Duration::from_millis(self.max_delay_ms));
        }

        let exponential =
            self.base_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32 - 1);
        let capped = exponential.min(self.max_delay_ms as f64);
        let jitter = capped * self.jitter_factor * (fastrand::f64() * 2.0 - 1.0);
        Duration::from_millis((capped + jitter).max(0.0) as u64)
    }
}

/// Run an operation, retrying on errors classified retryable by ErrorExt.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(err) if attempt < config.max_attempts && err.is_retryable() => {
                let delay = config.delay_for_attempt(attempt, err.retry_after());
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    operation_name, attempt, config.max_attempts, err, delay
                );
                sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfeed_core::HnApiError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_config(), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, CoreError>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_retryable_error_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_config(), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(CoreError::HnApi(HnApiError::ServerError { status_code: 503 }))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, CoreError> = with_retry(&fast_config(), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CoreError::HnApi(HnApiError::ItemNotFound { item_id: 1 }))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, CoreError> = with_retry(&fast_config(), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CoreError::HnApi(HnApiError::ServerError { status_code: 500 }))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_delay_growth_and_cap() {
        let config = RetryConfig {
            max_attempts: 5,
            base_delay_ms: 100,
            max_delay_ms: 300,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        };

        assert_eq!(config.delay_for_attempt(1, None), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2, None), Duration::from_millis(200));
        // Capped at max_delay_ms
        assert_eq!(config.delay_for_attempt(3, None), Duration::from_millis(300));
        assert_eq!(config.delay_for_attempt(4, None), Duration::from_millis(300));
    }

    #[test]
    fn test_suggested_delay_takes_precedence() {
        let config = fast_config();
        let delay = config.delay_for_attempt(1, Some(Duration::from_millis(3)));
        assert_eq!(delay, Duration::from_millis(3));
    }
}
