//! Host ↔ bidder contracts.
//!
//! Plain data passed between the auction host and a bidder adapter:
//! the outbound HTTP call an adapter asks for, the response the host's
//! transport got back, and the typed bids the adapter extracts from it.

use serde::{Deserialize, Serialize};

use super::openrtb::Bid;

/// Currency assumed when an exchange does not state one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// One outbound HTTP call built by an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestData {
    /// HTTP method, e.g. "POST".
    pub method: String,
    /// Absolute URL of the exchange endpoint.
    pub uri: String,
    /// Serialized payload.
    pub body: Vec<u8>,
    /// Headers to send along.
    pub headers: Vec<(String, String)>,
}

impl RequestData {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the transport received for a [`RequestData`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseData {
    pub status_code: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

/// Request-scoped context the host hands to adapters.
#[derive(Debug, Clone, Default)]
pub struct ExtraRequestInfo {
    /// Sec-GPC header was set on the incoming auction.
    pub global_privacy_control: bool,
}

/// Media type of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    Banner,
    Video,
    Audio,
    Native,
}

impl BidType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Native => "native",
        }
    }
}

impl std::fmt::Display for BidType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bid tagged with its media type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedBid {
    pub bid: Bid,
    pub bid_type: BidType,
}

/// Everything one exchange call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BidderResponse {
    pub currency: String,
    pub bids: Vec<TypedBid>,
}

impl BidderResponse {
    /// Empty response sized for `capacity` bids, in the default currency.
    pub fn with_bids_capacity(capacity: usize) -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            bids: Vec::with_capacity(capacity),
        }
    }
}

/// Static capabilities of a bidder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidderInfo {
    /// Who to contact about this adapter.
    pub maintainer_email: String,
    /// Media types accepted on site traffic; empty means site is unsupported.
    pub site_media_types: Vec<BidType>,
    /// Media types accepted on app traffic; empty means app is unsupported.
    pub app_media_types: Vec<BidType>,
}

impl BidderInfo {
    pub fn supports_site(&self) -> bool {
        !self.site_media_types.is_empty()
    }

    pub fn supports_app(&self) -> bool {
        !self.app_media_types.is_empty()
    }
}
