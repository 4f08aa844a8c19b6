//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) the auction use case requires.
//! Adapters implement these traits.
//!
//! Port categories:
//! - `Bidder`: exchange-specific request/response translation
//! - `HttpTransport`: execution of outbound exchange calls

pub mod bidder;
pub mod transport;
