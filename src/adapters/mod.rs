//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` and hosts the
//! service's external surfaces. Each sub-module groups adapters by concern.
//!
//! Adapter categories:
//! - `adform`: Adform OpenRTB bidder (pure request/response translation)
//! - `transport`: reqwest client executing exchange calls
//! - `http`: axum auction endpoint
//! - `metrics`: Prometheus metrics export and health checks

pub mod adform;
pub mod http;
pub mod metrics;
pub mod transport;
