//! Retry building blocks: backoff schedule and failure classification.

use std::fmt;
use std::time::Duration;
use weather_proxy_core::ResilienceConfig;

/// How the retry loop treats a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Wait and try again while attempts remain
    Retryable,
    /// Give up immediately, no delay
    Terminal,
}

/// Errors that know whether another attempt could succeed
pub trait Classify {
    fn kind(&self) -> FailureKind;

    fn is_retryable(&self) -> bool {
        self.kind() == FailureKind::Retryable
    }
}

/// Failures produced by the policy itself rather than by the operation.
///
/// Operation error types convert these into their own variants so callers
/// see a single error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The per-attempt deadline elapsed
    TimedOut(Duration),
    /// The caller's cancellation token fired
    Cancelled,
}

/// Trait for retry policies
pub trait RetryPolicy: Send + Sync {
    /// Delay before the retry following zero-indexed `attempt`.
    ///
    /// Returns `None` if no more retries should be attempted
    fn next_delay(&self, attempt: u32) -> Option<Duration>;

    /// Maximum number of retries after the first attempt
    fn max_retries(&self) -> u32;
}

/// Exponential backoff retry policy: `base_delay * 2^attempt`, no jitter, no cap
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: ResilienceConfig,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff policy
    pub fn new(config: ResilienceConfig) -> Self {
        Self { config }
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.config.max_retry_attempts {
            return None;
        }

        Some(self.config.delay_for_retry(attempt))
    }

    fn max_retries(&self) -> u32 {
        self.config.max_retry_attempts
    }
}

/// Error wrapper that includes retry attempt information
#[derive(Debug)]
pub struct RetryError<E> {
    /// The underlying error
    pub error: E,
    /// Number of attempts made
    pub attempts: u32,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Operation failed after {} attempts: {}",
            self.attempts, self.error
        )
    }
}

impl<E: std::error::Error> std::error::Error for RetryError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff_delays() {
        let policy = ExponentialBackoff::new(ResilienceConfig::new(1_000, 3, 100));

        assert_eq!(policy.next_delay(0), Some(Duration::from_millis(100)));
        assert_eq!(policy.next_delay(1), Some(Duration::from_millis(200)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_millis(400)));
        assert_eq!(policy.next_delay(3), None);
        assert_eq!(policy.max_retries(), 3);
    }

    #[test]
    fn test_zero_retries_never_delays() {
        let policy = ExponentialBackoff::new(ResilienceConfig::new(1_000, 0, 100));

        assert_eq!(policy.next_delay(0), None);
    }

    #[test]
    fn test_retry_error_display() {
        let error = RetryError {
            error: "connection refused",
            attempts: 3,
        };

        let display = format!("{}", error);
        assert!(display.contains("3 attempts"));
        assert!(display.contains("connection refused"));
    }
}
