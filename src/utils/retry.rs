//! Retry utilities with exponential backoff.
//!
//! Retrying is opt-in: the default [`RetryConfig`] makes a single attempt, so
//! failures reach the caller unchanged.

use std::time::Duration;
use tokio::time::sleep;

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl RetryConfig {
    /// A single attempt, no retries
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    /// Set the total number of attempts
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Delay before attempt number `attempt + 1` (1-based `attempt`)
    ///
    /// Never exceeds `max_delay`. A delay that is not a valid duration, e.g.
    /// from a negative multiplier, becomes `max_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powf(attempt.saturating_sub(1) as f64);
        Duration::try_from_secs_f64(exp)
            .map(|delay| delay.min(self.max_delay))
            .unwrap_or(self.max_delay)
    }
}

/// Create a retry configuration suited to the public service
pub fn api_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(30),
        backoff_multiplier: 2.0,
    }
}

/// Execute an async operation, retrying transient failures
///
/// Only errors for which [`SourceError::is_transient`] holds are retried; all
/// others are returned on the spot.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    let mut operation = operation;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Err(error) if error.is_transient() && attempts < config.max_attempts => {
                let delay = config.delay_after(attempts);
                tracing::warn!(
                    "Transient error on attempt {}/{}: {}, retrying in {:?}",
                    attempts,
                    config.max_attempts,
                    error,
                    delay
                );
                sleep(delay).await;
            }
            Err(error) => {
                if attempts > 1 {
                    tracing::warn!("Operation failed after {} attempts: {}", attempts, error);
                }
                return Err(error);
            }
        }
    }
}
