//! Domain layer - OpenRTB wire types, host contracts, bidder params and errors.
//!
//! Pure data and parsing only. Nothing here performs I/O, so every type
//! can be built and tested in isolation.

pub mod bidder;
pub mod errors;
pub mod openrtb;
pub mod params;

// Re-export core types for convenience
pub use bidder::{
    BidType, BidderInfo, BidderResponse, ExtraRequestInfo, RequestData, ResponseData, TypedBid,
};
pub use errors::BidderError;
pub use openrtb::{Bid, BidRequest, BidResponse, Imp, SeatBid};
pub use params::{ExtImpAdformOpenRtb, MasterTagId};
