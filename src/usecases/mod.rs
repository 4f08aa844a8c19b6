//! Use Cases Layer - Auction Host Logic
//!
//! Orchestrates a bidder and a transport to run auctions. The bidder
//! stays a pure translator; everything stateful or concurrent is here.
//!
//! Use cases:
//! - `BidderRunner`: one auction against one bidder
//! - `enforce_capabilities`: pre-filter requests by bidder info

pub mod auction;
pub mod capabilities;
