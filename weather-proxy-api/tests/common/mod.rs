//! Shared fixtures for API integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use weather_proxy_api::resilience::ResiliencePolicy;
use weather_proxy_api::upstream::{FetchError, UpstreamClient, WeatherSource};
use weather_proxy_api::WeatherService;
use weather_proxy_core::domain::{ResilienceConfig, Snapshot, UpstreamConfig};
use weather_proxy_core::SnapshotStore;

mock! {
    pub Store {}

    #[async_trait]
    impl SnapshotStore for Store {
        async fn append(&self, payload: &str) -> weather_proxy_core::Result<Snapshot>;
        async fn latest(&self) -> weather_proxy_core::Result<Option<Snapshot>>;
        async fn health_check(&self) -> weather_proxy_core::Result<()>;
    }
}

/// Small, fast policy: 500ms per attempt, `retries` retries, 10ms base delay
pub fn fast_policy(retries: u32) -> ResiliencePolicy {
    ResiliencePolicy::new(ResilienceConfig::new(500, retries, 10))
}

pub fn upstream_client(url: impl Into<String>) -> Arc<dyn WeatherSource> {
    Arc::new(UpstreamClient::new(UpstreamConfig::new(url)).expect("valid upstream config"))
}

pub fn service(
    source: Arc<dyn WeatherSource>,
    store: Arc<dyn SnapshotStore>,
    retries: u32,
) -> WeatherService {
    WeatherService::new(source, store, fast_policy(retries))
}

/// URL on a port nothing listens on, for connection-refused failures
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/weather", port)
}

/// Source whose answer depends on the zero-indexed call number
pub struct ScriptedSource<F> {
    calls: AtomicU32,
    respond: F,
}

impl<F> ScriptedSource<F>
where
    F: Fn(u32) -> Result<String, FetchError> + Send + Sync,
{
    pub fn new(respond: F) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            respond,
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> WeatherSource for ScriptedSource<F>
where
    F: Fn(u32) -> Result<String, FetchError> + Send + Sync,
{
    async fn fetch(&self, _cancel: CancellationToken) -> Result<String, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(call)
    }
}
