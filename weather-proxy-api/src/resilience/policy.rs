use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use weather_proxy_core::ResilienceConfig;

use super::retry::{Classify, ExponentialBackoff, FailureKind, Interruption, RetryError, RetryPolicy};
use super::timeout::{sleep_or_cancel, with_attempt_timeout, AttemptOutcome};

/// Timeout plus exponential retry around one unit of work.
///
/// Each attempt runs under a child of the caller's token that also fires
/// when `attempt_timeout` elapses. Retryable failures wait
/// `base_delay * 2^attempt` before the next attempt; terminal failures and
/// caller cancellation return at once.
#[derive(Debug, Clone)]
pub struct ResiliencePolicy {
    attempt_timeout: Duration,
    backoff: ExponentialBackoff,
}

impl ResiliencePolicy {
    pub fn new(config: ResilienceConfig) -> Self {
        Self {
            attempt_timeout: config.attempt_timeout,
            backoff: ExponentialBackoff::new(config),
        }
    }

    /// Run `operation` until it succeeds, fails terminally, or retries run out.
    ///
    /// # Errors
    ///
    /// Returns the last failure together with the number of attempts made.
    /// Caller cancellation surfaces as `E::from(Interruption::Cancelled)`.
    pub async fn execute<F, Fut, T, E>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + From<Interruption> + fmt::Display,
    {
        let mut attempt: u32 = 0;

        loop {
            debug!(
                "Attempt {}/{}",
                attempt + 1,
                self.backoff.max_retries().saturating_add(1)
            );

            let error = match with_attempt_timeout(self.attempt_timeout, cancel, &mut operation).await {
                AttemptOutcome::Completed(Ok(value)) => {
                    if attempt > 0 {
                        debug!("Operation succeeded after {} retries", attempt);
                    }
                    return Ok(value);
                }
                AttemptOutcome::Completed(Err(e)) => e,
                AttemptOutcome::TimedOut => E::from(Interruption::TimedOut(self.attempt_timeout)),
                AttemptOutcome::Cancelled => E::from(Interruption::Cancelled),
            };

            let attempts = attempt + 1;

            // only the caller's token means "caller cancelled"; the error variant does not
            if cancel.is_cancelled() {
                debug!("Caller cancelled after {} attempts: {}", attempts, error);
                return Err(RetryError {
                    error: E::from(Interruption::Cancelled),
                    attempts,
                });
            }

            if error.kind() == FailureKind::Terminal {
                warn!("Error is not retryable, giving up: {}", error);
                return Err(RetryError { error, attempts });
            }

            let Some(delay) = self.backoff.next_delay(attempt) else {
                warn!("Max retry attempts reached after {} attempts: {}", attempts, error);
                return Err(RetryError { error, attempts });
            };

            warn!(
                "Retryable error on attempt {}, retrying after {:?}: {}",
                attempts, delay, error
            );

            if !sleep_or_cancel(delay, cancel).await {
                debug!("Cancelled during retry backoff");
                return Err(RetryError {
                    error: E::from(Interruption::Cancelled),
                    attempts,
                });
            }

            attempt += 1;
        }
    }
}
