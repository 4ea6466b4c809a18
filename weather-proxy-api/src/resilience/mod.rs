//! Resilience patterns for the upstream weather call.
//!
//! - **Retry**: exponential backoff, driven by an explicit [`FailureKind`] per error
//! - **Timeout**: per-attempt deadline layered on the caller's cancellation token
//! - **Policy**: the two combined into [`ResiliencePolicy::execute`]
//!
//! # Example
//!
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use weather_proxy_api::resilience::ResiliencePolicy;
//! use weather_proxy_api::upstream::FetchError;
//! use weather_proxy_core::ResilienceConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = ResiliencePolicy::new(ResilienceConfig::default());
//! let cancel = CancellationToken::new();
//!
//! let body = policy
//!     .execute(&cancel, |_attempt_token| async { Ok::<_, FetchError>("{}".to_string()) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod policy;
pub mod retry;
pub mod timeout;

pub use policy::ResiliencePolicy;
pub use retry::{Classify, ExponentialBackoff, FailureKind, Interruption, RetryError, RetryPolicy};
pub use timeout::{sleep_or_cancel, with_attempt_timeout, AttemptOutcome};
