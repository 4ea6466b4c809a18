//! Fetch-or-fallback orchestration.
//!
//! One call to [`WeatherService::get_weather_data`] is a fetch cycle:
//!
//! ```text
//! Attempting -> Succeeded -> Persisting -> Returned(payload)
//!      |  ^
//!      v  |
//!   RetryWait
//!      |
//!      v
//!   Failed -> CacheLookup -> Returned(cached | absent)
//! ```
//!
//! Upstream failures, malformed payloads and persistence failures all end
//! in the cache lookup. Only caller cancellation and a failing cache read
//! reach the caller as errors.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use weather_proxy_core::{CoreError, SnapshotStore};

use crate::observability::metrics::{record_fetch_outcome, FetchOutcome};
use crate::resilience::{ResiliencePolicy, RetryError};
use crate::upstream::{FetchError, WeatherSource};

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Retries exhausted or a terminal upstream failure
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] RetryError<FetchError>),

    /// The fetched payload could not be stored
    #[error("Failed to persist snapshot: {0}")]
    Persistence(#[source] CoreError),

    /// The fallback read failed, so "no data" cannot be told apart from "store down"
    #[error("Snapshot cache unavailable: {0}")]
    CacheUnavailable(#[source] CoreError),

    #[error("Fetch cycle cancelled")]
    Cancelled,
}

pub struct WeatherService {
    source: Arc<dyn WeatherSource>,
    store: Arc<dyn SnapshotStore>,
    policy: ResiliencePolicy,
}

impl WeatherService {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        store: Arc<dyn SnapshotStore>,
        policy: ResiliencePolicy,
    ) -> Self {
        Self {
            source,
            store,
            policy,
        }
    }

    /// Current weather document, fresh from upstream or the latest cached one.
    ///
    /// `Ok(None)` means the upstream failed and nothing has ever been cached.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Cancelled`] when `cancel` fires during the cycle, and
    /// [`ServiceError::CacheUnavailable`] when the fallback read fails.
    pub async fn get_weather_data(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ServiceError> {
        match self.fetch_and_store(cancel).await {
            Ok(payload) => {
                record_fetch_outcome(FetchOutcome::Fresh);
                Ok(Some(payload))
            }
            Err(ServiceError::Cancelled) => {
                debug!("Weather fetch cancelled by caller");
                record_fetch_outcome(FetchOutcome::Cancelled);
                Err(ServiceError::Cancelled)
            }
            Err(failure) => {
                warn!("Weather fetch failed, falling back to cache: {}", failure);
                self.fallback(cancel).await
            }
        }
    }

    async fn fetch_and_store(&self, cancel: &CancellationToken) -> Result<String, ServiceError> {
        let source: &dyn WeatherSource = self.source.as_ref();
        let payload = self
            .policy
            .execute(cancel, move |attempt_token| source.fetch(attempt_token))
            .await
            .map_err(|e| {
                if cancel.is_cancelled() {
                    ServiceError::Cancelled
                } else {
                    ServiceError::Upstream(e)
                }
            })?;

        // not raced against `cancel`: an append either commits or reports failure
        let snapshot = self
            .store
            .append(&payload)
            .await
            .map_err(ServiceError::Persistence)?;

        info!(snapshot_id = %snapshot.id, bytes = payload.len(), "Stored fresh weather snapshot");
        Ok(payload)
    }

    async fn fallback(&self, cancel: &CancellationToken) -> Result<Option<String>, ServiceError> {
        let latest = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                record_fetch_outcome(FetchOutcome::Cancelled);
                return Err(ServiceError::Cancelled);
            }
            latest = self.store.latest() => latest,
        };

        match latest {
            Ok(Some(snapshot)) => {
                info!(
                    snapshot_id = %snapshot.id,
                    age_seconds = snapshot.age(Utc::now()).num_seconds(),
                    "Serving cached weather snapshot"
                );
                record_fetch_outcome(FetchOutcome::Cached);
                Ok(Some(snapshot.payload))
            }
            Ok(None) => {
                warn!("No cached weather snapshot available");
                record_fetch_outcome(FetchOutcome::Empty);
                Ok(None)
            }
            Err(e) => {
                error!("Failed to read cached weather snapshot: {}", e);
                record_fetch_outcome(FetchOutcome::Error);
                Err(ServiceError::CacheUnavailable(e))
            }
        }
    }
}
