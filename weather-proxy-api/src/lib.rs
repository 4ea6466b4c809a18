//! HTTP surface and fetch orchestration for the weather proxy.

pub mod error;
pub mod handlers;
pub mod observability;
pub mod resilience;
pub mod service;
pub mod upstream;

use axum::{routing::get, Router};
use std::sync::Arc;
use weather_proxy_core::SnapshotStore;

pub use error::{ApiError, ApiResult};
pub use service::{ServiceError, WeatherService};
pub use upstream::{FetchError, UpstreamClient, WeatherSource};

#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherService>,
    /// Same store the service writes to, probed by `/health`
    pub store: Arc<dyn SnapshotStore>,
}

impl AppState {
    pub fn new(weather: Arc<WeatherService>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { weather, store }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(handlers::weather::get_current))
        .with_state(state)
}

pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(observability::health_handler))
        .with_state(state)
}
