//! Metrics & Health Adapters
//!
//! Prometheus metrics export and liveness/readiness probes.

pub mod health;
pub mod prometheus;

pub use self::health::HealthState;
pub use self::prometheus::MetricsRegistry;
