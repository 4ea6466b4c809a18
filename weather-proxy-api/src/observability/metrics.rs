//! Prometheus metrics for the fetch cycle.
//!
//! Counters are recorded through the `metrics` facade; without an installed
//! recorder they are no-ops, which keeps tests free of global state.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::error;

pub const FETCH_TOTAL: &str = "weather_fetch_total";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to install metrics recorder: {0}")]
    Installation(String),
}

/// How a fetch cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Upstream answered and the payload was stored
    Fresh,
    /// Served the latest cached snapshot
    Cached,
    /// Nothing to serve
    Empty,
    Cancelled,
    /// Fallback read failed
    Error,
}

impl FetchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOutcome::Fresh => "fresh",
            FetchOutcome::Cached => "cached",
            FetchOutcome::Empty => "empty",
            FetchOutcome::Cancelled => "cancelled",
            FetchOutcome::Error => "error",
        }
    }
}

/// Install the Prometheus recorder. Later calls are no-ops.
///
/// # Errors
///
/// Returns an error if the recorder cannot be installed.
pub fn init_metrics() -> Result<(), MetricsError> {
    if PROMETHEUS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::Installation("Handle already set".to_string()))?;

    describe_counter!(
        FETCH_TOTAL,
        Unit::Count,
        "Weather fetch cycles by outcome"
    );

    Ok(())
}

pub fn record_fetch_outcome(outcome: FetchOutcome) {
    counter!(FETCH_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// `GET /metrics` in Prometheus text format
pub async fn metrics_handler() -> Response {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => {
            error!("Metrics handler called but metrics not initialized");
            (StatusCode::INTERNAL_SERVER_ERROR, "Metrics not initialized").into_response()
        }
    }
}
