//! HTTP client for the third-party weather endpoint.
//!
//! A fetch is one GET with optional auth headers. The body is checked for
//! JSON well-formedness and handed back untouched.

use async_trait::async_trait;
use reqwest::{header, Client, Request, StatusCode};
use serde::de::IgnoredAny;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use weather_proxy_core::UpstreamConfig;

use crate::resilience::{Classify, FailureKind, Interruption};

pub const API_KEY_HEADER: &str = "X-Api-Key";

const USER_AGENT: &str = concat!("weather-proxy/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS, or body read failure
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(StatusCode),

    #[error("Upstream attempt timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("Upstream returned invalid JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Invalid upstream request: {0}")]
    InvalidRequest(String),

    /// The attempt was cancelled. Whether the caller asked for it is decided
    /// by the caller's token, not by this variant.
    #[error("Fetch cancelled")]
    Cancelled,
}

impl Classify for FetchError {
    fn kind(&self) -> FailureKind {
        match self {
            FetchError::Transport(_)
            | FetchError::Status(_)
            | FetchError::Timeout { .. }
            | FetchError::InvalidPayload(_)
            | FetchError::Cancelled => FailureKind::Retryable,
            FetchError::InvalidRequest(_) => FailureKind::Terminal,
        }
    }
}

impl From<Interruption> for FetchError {
    fn from(interruption: Interruption) -> Self {
        match interruption {
            Interruption::TimedOut(elapsed) => FetchError::Timeout { elapsed },
            Interruption::Cancelled => FetchError::Cancelled,
        }
    }
}

/// Source of raw weather documents
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// One attempt at fetching the current weather document.
    ///
    /// Implementations should stop promptly once `cancel` fires.
    async fn fetch(&self, cancel: CancellationToken) -> Result<String, FetchError>;
}

/// Check that `body` is syntactically valid JSON without keeping the parse.
pub fn validate_json(body: &str) -> Result<(), FetchError> {
    serde_json::from_str::<IgnoredAny>(body)
        .map(|_| ())
        .map_err(FetchError::InvalidPayload)
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a client for the configured upstream.
    ///
    /// # Errors
    ///
    /// Fails when the URL does not parse or the HTTP client cannot be built.
    pub fn new(config: UpstreamConfig) -> Result<Self, FetchError> {
        url::Url::parse(&config.url)
            .map_err(|e| FetchError::InvalidRequest(format!("{}: {}", config.url, e)))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// GET request for the upstream URL with the configured auth headers.
    pub fn build_request(&self) -> Result<Request, FetchError> {
        let mut request = self
            .client
            .get(&self.config.url)
            .header(header::ACCEPT, "application/json");

        if let Some(authorization) = self.config.authorization() {
            request = request.header(header::AUTHORIZATION, authorization);
        }

        if let Some(api_key) = self.config.api_key() {
            request = request.header(API_KEY_HEADER, api_key);
        }

        request
            .build()
            .map_err(|e| FetchError::InvalidRequest(e.to_string()))
    }

    async fn send(&self, request: Request) -> Result<String, FetchError> {
        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            debug!("Upstream returned status {}", status);
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        validate_json(&body)?;

        debug!("Upstream returned {} bytes of valid JSON", body.len());
        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for UpstreamClient {
    async fn fetch(&self, cancel: CancellationToken) -> Result<String, FetchError> {
        let request = self.build_request()?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.send(request) => result,
        }
    }
}
