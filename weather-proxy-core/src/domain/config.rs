use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoreError, Result};

pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Where and how to call the weather upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub url: String,
    #[serde(default)]
    pub auth_scheme: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl UpstreamConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_authorization(mut self, scheme: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth_scheme = Some(scheme.into());
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// `Authorization` header value, present only when both scheme and token are non-empty.
    pub fn authorization(&self) -> Option<String> {
        let scheme = non_empty(self.auth_scheme.as_deref())?;
        let token = non_empty(self.auth_token.as_deref())?;
        Some(format!("{} {}", scheme, token))
    }

    /// `X-Api-Key` header value, present only when non-empty.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(CoreError::Validation("upstream url must not be empty".to_string()));
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Per-attempt timeout and exponential retry parameters.
///
/// A `max_retry_attempts` of zero means a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResilienceConfig {
    pub attempt_timeout: Duration,
    pub max_retry_attempts: u32,
    pub base_delay: Duration,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS),
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl ResilienceConfig {
    pub fn new(attempt_timeout_ms: u64, max_retry_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            attempt_timeout: Duration::from_millis(attempt_timeout_ms),
            max_retry_attempts,
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Wait before the retry that follows zero-indexed `attempt`: `base_delay * 2^attempt`.
    ///
    /// Clamps to [`Duration::MAX`] once the product no longer fits.
    pub fn delay_for_retry(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }

        1u128
            .checked_shl(attempt)
            .and_then(|factor| self.base_delay.as_nanos().checked_mul(factor))
            .and_then(|nanos| {
                let secs = u64::try_from(nanos / NANOS_PER_SEC).ok()?;
                // remainder is below one second, so it fits in u32
                Some(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
            })
            .unwrap_or(Duration::MAX)
    }

    /// Total attempts including the first one
    pub fn total_attempts(&self) -> u32 {
        self.max_retry_attempts.saturating_add(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.attempt_timeout.is_zero() {
            return Err(CoreError::Validation(
                "attempt timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
