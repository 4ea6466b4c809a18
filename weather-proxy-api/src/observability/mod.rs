//! Logging, metrics and health checks for the weather proxy.

pub mod health;
pub mod logging;
pub mod metrics;

pub use health::{health_handler, HealthReport, HealthStatus};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, metrics_handler, record_fetch_outcome, FetchOutcome, MetricsError};
