use anyhow::{anyhow, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use weather_proxy_api::observability::{init_logging, init_metrics, metrics_handler, LogConfig};
use weather_proxy_api::resilience::ResiliencePolicy;
use weather_proxy_api::{AppState, UpstreamClient, WeatherService};
use weather_proxy_core::SnapshotStore;
use weather_proxy_storage::postgres::{self, PostgresConfig};
use weather_proxy_storage::{InMemorySnapshotStore, SnapshotRepository};

mod config;

use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    init_logging(LogConfig::new(config.log_level.clone(), config.log_format))
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Starting weather proxy");

    init_metrics()?;

    let store = build_store(&config).await?;

    let upstream = UpstreamClient::new(config.upstream_config())?;
    tracing::info!("Upstream configured: {}", config.upstream.url);

    let policy = ResiliencePolicy::new(config.resilience_config());
    let weather = Arc::new(WeatherService::new(Arc::new(upstream), store.clone(), policy));
    let state = AppState::new(weather, store);

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(weather_proxy_api::health_routes(state.clone()))
        .nest("/api/v1", weather_proxy_api::routes(state))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Weather proxy stopped");
    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn SnapshotStore>> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_config = PostgresConfig::new(config.storage.database_url.clone())
                .with_max_connections(config.storage.max_connections);
            let pool = postgres::create_pool_with_config(&pg_config).await?;
            postgres::migrate(&pool).await?;
            tracing::info!("Database pool initialized");
            Ok(Arc::new(SnapshotRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory snapshot store; cached data is lost on restart");
            Ok(Arc::new(InMemorySnapshotStore::new()))
        }
    }
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT (Ctrl+C)"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
