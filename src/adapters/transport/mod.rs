//! Reqwest Transport - Outbound Exchange HTTP Client
//!
//! Implements the `HttpTransport` port with a pooled reqwest client.
//! Concurrency is capped with a semaphore and every call carries a
//! timeout. Calls are never retried; an auction has one shot per exchange.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::config::TransportConfig;
use crate::domain::bidder::{RequestData, ResponseData};
use crate::ports::transport::{HttpTransport, TransportError};

/// Configuration for the exchange transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransportConfig {
    /// Per-call timeout.
    pub timeout: Duration,
    /// Maximum in-flight calls.
    pub max_concurrent: usize,
}

impl Default for ReqwestTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(500),
            max_concurrent: 32,
        }
    }
}

impl From<&TransportConfig> for ReqwestTransportConfig {
    fn from(config: &TransportConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_concurrent: config.max_concurrent,
        }
    }
}

/// Reqwest-backed transport for bidder calls.
pub struct ReqwestTransport {
    /// Underlying HTTP client.
    http: Client,
    /// Transport configuration.
    config: ReqwestTransportConfig,
    /// Concurrency limiter.
    semaphore: Arc<Semaphore>,
}

impl ReqwestTransport {
    /// Create a new transport.
    pub fn new(config: ReqwestTransportConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(16)
            .build()
            .context("Failed to build HTTP client")?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

        Ok(Self {
            http,
            config,
            semaphore,
        })
    }

    fn failed(uri: &str, reason: impl ToString) -> TransportError {
        TransportError::Failed {
            uri: uri.to_string(),
            reason: reason.to_string(),
        }
    }

    fn to_header_map(request: &RequestData) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Self::failed(&request.uri, e))?;
            let value = HeaderValue::from_str(value).map_err(|e| Self::failed(&request.uri, e))?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, uri = %request.uri))]
    async fn send(&self, request: &RequestData) -> Result<ResponseData, TransportError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Self::failed(&request.uri, e))?;

        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| Self::failed(&request.uri, e))?;

        let response = self
            .http
            .request(method, &request.uri)
            .headers(Self::to_header_map(request)?)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Exchange call timed out");
                    TransportError::Timeout {
                        uri: request.uri.clone(),
                        timeout_ms: u64::try_from(self.config.timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    }
                } else {
                    warn!(error = %e, "Exchange call failed");
                    Self::failed(&request.uri, e)
                }
            })?;

        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::failed(&request.uri, e))?
            .to_vec();

        debug!(status = status_code, bytes = body.len(), "Exchange responded");

        Ok(ResponseData {
            status_code,
            body,
            headers,
        })
    }
}
