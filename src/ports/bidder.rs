//! Bidder Port - Request/Response Translation Interface
//!
//! A bidder turns the host's bid request into the HTTP calls one exchange
//! understands, and turns that exchange's answers back into typed bids.
//!
//! Implementations are pure: no I/O, no retries, no shared state. The host
//! owns the transport, deadlines and aggregation across bidders.

use crate::domain::bidder::{
    BidderInfo, BidderResponse, ExtraRequestInfo, RequestData, ResponseData,
};
use crate::domain::errors::BidderError;
use crate::domain::openrtb::BidRequest;

/// Trait for exchange-specific bidder adapters.
pub trait Bidder: Send + Sync + 'static {
    /// Build the outbound HTTP calls for an auction.
    ///
    /// Returns the calls to make together with non-fatal errors, e.g. one
    /// per impression that had to be skipped. Both may be non-empty.
    fn make_requests(
        &self,
        request: &BidRequest,
        extra: &ExtraRequestInfo,
    ) -> (Vec<RequestData>, Vec<BidderError>);

    /// Parse one exchange response into bids.
    ///
    /// # Errors
    /// Returns the error bucket matching the HTTP status or the decode failure.
    fn make_bids(
        &self,
        request: &BidRequest,
        request_data: &RequestData,
        response: &ResponseData,
    ) -> Result<BidderResponse, BidderError>;

    /// Static capabilities used by the host to pre-filter requests.
    fn info(&self) -> BidderInfo;
}
