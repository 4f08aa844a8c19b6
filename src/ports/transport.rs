//! HTTP Transport Port - Outbound Exchange Calls
//!
//! The host executes the [`RequestData`] a bidder produced and hands the
//! raw result back. Any HTTP status is a successful transport outcome;
//! only failures to get a response at all are errors.

use async_trait::async_trait;

use crate::domain::bidder::{RequestData, ResponseData};

/// Why a call produced no HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The per-call deadline elapsed.
    #[error("timed out after {timeout_ms}ms calling {uri}")]
    Timeout { uri: String, timeout_ms: u64 },

    /// Connection, TLS or protocol failure.
    #[error("request to {uri} failed: {reason}")]
    Failed { uri: String, reason: String },
}

/// Trait for transports executing bidder HTTP calls.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    /// Execute a single call and return whatever the exchange answered.
    async fn send(&self, request: &RequestData) -> Result<ResponseData, TransportError>;
}
