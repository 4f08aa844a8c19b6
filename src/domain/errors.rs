//! Bidder error taxonomy.
//!
//! Every error surfaced by an adapter or by the host harness maps onto one
//! of a handful of buckets. The numeric codes are stable and are what the
//! host reports back to the publisher in `ext.errors`.

use serde::Serialize;
use thiserror::Error;

/// Error code for timeouts talking to the exchange.
pub const TIMEOUT_CODE: u32 = 1;
/// Error code for invalid publisher input.
pub const BAD_INPUT_CODE: u32 = 2;
/// Error code for an unexpected exchange response.
pub const BAD_SERVER_RESPONSE_CODE: u32 = 4;
/// Error code for transport failures.
pub const FAILED_TO_REQUEST_BIDS_CODE: u32 = 5;
/// Error code for anything without a dedicated bucket.
pub const UNKNOWN_CODE: u32 = 999;

/// Errors reported by bidders and the auction runner.
#[derive(Error, Debug)]
pub enum BidderError {
    /// The exchange did not answer within the deadline.
    #[error("{message}")]
    Timeout { message: String },

    /// The request is unusable for this bidder (bad params, empty response to a bad request).
    #[error("{message}")]
    BadInput { message: String },

    /// The exchange answered with something other than a bid or a clean no-bid.
    #[error("{message}")]
    BadServerResponse { message: String },

    /// The transport could not complete the call.
    #[error("{message}")]
    FailedToRequestBids { message: String },

    /// Outbound JSON encoding failed.
    #[error("failed to encode request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Inbound JSON decoding failed.
    #[error("{0}")]
    Deserialization(#[source] serde_json::Error),
}

impl BidderError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput {
            message: message.into(),
        }
    }

    pub fn bad_server_response(message: impl Into<String>) -> Self {
        Self::BadServerResponse {
            message: message.into(),
        }
    }

    /// Stable numeric code for this error.
    pub const fn code(&self) -> u32 {
        match self {
            Self::Timeout { .. } => TIMEOUT_CODE,
            Self::BadInput { .. } => BAD_INPUT_CODE,
            Self::BadServerResponse { .. } => BAD_SERVER_RESPONSE_CODE,
            Self::FailedToRequestBids { .. } => FAILED_TO_REQUEST_BIDS_CODE,
            Self::Serialization(_) | Self::Deserialization(_) => UNKNOWN_CODE,
        }
    }

    /// Short label used for metrics and log fields.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::BadInput { .. } => "bad_input",
            Self::BadServerResponse { .. } => "bad_server_response",
            Self::FailedToRequestBids { .. } => "failed_to_request_bids",
            Self::Serialization(_) => "serialization",
            Self::Deserialization(_) => "deserialization",
        }
    }

    /// Wire form used in `ext.errors` of the auction response.
    pub fn to_message(&self) -> ErrorMessage {
        ErrorMessage {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// `{code, message}` pair as reported to the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub code: u32,
    pub message: String,
}
