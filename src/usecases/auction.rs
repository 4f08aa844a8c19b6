//! Bidder Runner - One Auction Against One Bidder
//!
//! Drives a bidder through a full auction:
//! 1. enforce declared capabilities
//! 2. build exchange calls (`make_requests`)
//! 3. send every call concurrently through the transport
//! 4. parse each answer (`make_bids`)
//!
//! Errors never abort the run; they are collected next to the bids.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::domain::bidder::{
    DEFAULT_CURRENCY, ExtraRequestInfo, RequestData, ResponseData, TypedBid,
};
use crate::domain::errors::BidderError;
use crate::domain::openrtb::{BidRequest, BidResponse, SeatBid};
use crate::ports::bidder::Bidder;
use crate::ports::transport::{HttpTransport, TransportError};
use crate::usecases::capabilities::enforce_capabilities;

/// Record of one exchange call, for debugging and metrics.
#[derive(Debug, Clone)]
pub struct HttpCall {
    pub uri: String,
    /// HTTP status, `None` if the transport failed.
    pub status_code: Option<u16>,
    pub latency_us: u64,
}

/// Everything one bidder produced for one auction.
#[derive(Debug, Default)]
pub struct SeatOutcome {
    pub bids: Vec<TypedBid>,
    pub currency: String,
    pub errors: Vec<BidderError>,
    pub http_calls: Vec<HttpCall>,
}

impl SeatOutcome {
    /// Render as an OpenRTB response with a single seat.
    ///
    /// Errors are reported under `ext.errors.<seat>` as `{code, message}`.
    pub fn into_bid_response(self, request_id: &str, seat: &str) -> BidResponse {
        let mut response = BidResponse {
            id: request_id.to_string(),
            cur: Some(self.currency),
            ..BidResponse::default()
        };

        if !self.bids.is_empty() {
            let bid = self
                .bids
                .into_iter()
                .map(|typed| {
                    let mut bid = typed.bid;
                    let mut ext = bid.ext.take().unwrap_or_else(|| json!({}));
                    if let Some(obj) = ext.as_object_mut() {
                        obj.insert("prebid".to_string(), json!({"type": typed.bid_type}));
                    }
                    bid.ext = Some(ext);
                    bid
                })
                .collect();
            response.seatbid.push(SeatBid {
                bid,
                seat: Some(seat.to_string()),
                ..SeatBid::default()
            });
        }

        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.iter().map(BidderError::to_message).collect();
            response.ext = Some(json!({ "errors": { seat: messages } }));
        }

        response
    }
}

/// Runs auctions for one bidder over one transport.
pub struct BidderRunner<B: Bidder, T: HttpTransport> {
    bidder: Arc<B>,
    transport: Arc<T>,
}

impl<B: Bidder, T: HttpTransport> BidderRunner<B, T> {
    pub fn new(bidder: Arc<B>, transport: Arc<T>) -> Self {
        Self { bidder, transport }
    }

    pub fn bidder(&self) -> &B {
        &self.bidder
    }

    /// Run one auction and collect bids and errors.
    #[instrument(skip_all, fields(request_id = %request.id, imps = request.imp.len()))]
    pub async fn run(&self, request: &BidRequest, extra: &ExtraRequestInfo) -> SeatOutcome {
        let mut outcome = SeatOutcome {
            currency: DEFAULT_CURRENCY.to_string(),
            ..SeatOutcome::default()
        };

        let filtered = match enforce_capabilities(request, &self.bidder.info()) {
            Ok(filtered) => filtered,
            Err(e) => {
                debug!(error = %e, "Request filtered out by bidder capabilities");
                outcome.errors.push(e);
                return outcome;
            }
        };
        outcome.errors.extend(filtered.warnings);
        let request = filtered.request;

        let (calls, build_errors) = self.bidder.make_requests(&request, extra);
        outcome.errors.extend(build_errors);

        if calls.is_empty() {
            debug!(errors = outcome.errors.len(), "Bidder built no exchange calls");
            return outcome;
        }

        let results = join_all(calls.iter().map(|call| self.execute(call))).await;

        for (call, (record, result)) in calls.iter().zip(results) {
            outcome.http_calls.push(record);
            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    outcome.errors.push(transport_error(e));
                    continue;
                }
            };

            match self.bidder.make_bids(&request, call, &response) {
                Ok(bidder_response) => {
                    outcome.currency = bidder_response.currency;
                    outcome.bids.extend(bidder_response.bids);
                }
                Err(e) => {
                    warn!(status = response.status_code, error = %e, "Exchange answer rejected");
                    outcome.errors.push(e);
                }
            }
        }

        info!(
            bids = outcome.bids.len(),
            errors = outcome.errors.len(),
            calls = outcome.http_calls.len(),
            "Auction finished"
        );

        outcome
    }

    async fn execute(
        &self,
        call: &RequestData,
    ) -> (HttpCall, Result<ResponseData, TransportError>) {
        let started = Instant::now();
        let result = self.transport.send(call).await;
        let record = HttpCall {
            uri: call.uri.clone(),
            status_code: result.as_ref().ok().map(|r| r.status_code),
            latency_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        (record, result)
    }
}

fn transport_error(err: TransportError) -> BidderError {
    match err {
        TransportError::Timeout { .. } => BidderError::Timeout {
            message: err.to_string(),
        },
        TransportError::Failed { .. } => BidderError::FailedToRequestBids {
            message: err.to_string(),
        },
    }
}
