//! Per-attempt deadlines and abortable waits.
//!
//! Both helpers race their work against a [`CancellationToken`]; whichever
//! finishes first decides the outcome.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

/// Result of a single bounded attempt
#[derive(Debug, PartialEq, Eq)]
pub enum AttemptOutcome<T> {
    /// The operation finished before the deadline
    Completed(T),
    /// The deadline elapsed first; the attempt token has been cancelled
    TimedOut,
    /// The parent token fired first
    Cancelled,
}

/// Run `operation` with a child of `parent` that is also cancelled once
/// `duration` elapses.
///
/// The operation receives the child token so in-flight I/O can observe
/// either signal.
pub async fn with_attempt_timeout<F, Fut, T>(
    duration: Duration,
    parent: &CancellationToken,
    operation: F,
) -> AttemptOutcome<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = T>,
{
    let attempt_token = parent.child_token();
    let future = operation(attempt_token.clone());

    tokio::select! {
        biased;
        _ = parent.cancelled() => AttemptOutcome::Cancelled,
        result = timeout(duration, future) => match result {
            Ok(value) => AttemptOutcome::Completed(value),
            Err(_elapsed) => {
                attempt_token.cancel();
                AttemptOutcome::TimedOut
            }
        },
    }
}

/// Sleep for `delay` unless `token` fires first.
///
/// Returns `true` when the full delay elapsed.
pub async fn sleep_or_cancel(delay: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = sleep(delay) => true,
    }
}
