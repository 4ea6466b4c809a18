//! Liveness and storage reachability for `/health`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn http_status(&self) -> StatusCode {
        match self {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> Response {
        (self.status.http_status(), Json(self)).into_response()
    }
}

/// GET /health
///
/// 503 when the snapshot store cannot be reached, since the proxy could
/// neither persist nor fall back.
pub async fn health_handler(State(state): State<AppState>) -> HealthReport {
    match state.store.health_check().await {
        Ok(()) => HealthReport {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => {
            warn!("Snapshot store health check failed: {}", e);
            HealthReport {
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_http_status() {
        assert_eq!(HealthStatus::Healthy.http_status(), StatusCode::OK);
        assert_eq!(
            HealthStatus::Unhealthy.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_healthy_report_omits_message() {
        let report = HealthReport {
            status: HealthStatus::Healthy,
            message: None,
        };

        assert_eq!(serde_json::to_string(&report).unwrap(), r#"{"status":"healthy"}"#);
    }
}
