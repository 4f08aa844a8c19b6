//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml` (path
//! overridable with `BIDDER_CONFIG`). The exchange endpoint and all
//! host-side limits live here - nothing is hardcoded in the adapter.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  pub service: ServiceConfig,
  /// Bidder identity and exchange endpoint.
  pub bidder: BidderConfig,
  /// Outbound transport limits.
  #[serde(default)]
  pub transport: TransportConfig,
  /// Auction HTTP server.
  #[serde(default)]
  pub server: ServerConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Bidder configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BidderConfig {
  /// Seat name reported in auction responses.
  #[serde(default = "default_bidder_name")]
  pub name: String,
  /// Adform OpenRTB endpoint URL.
  pub endpoint: String,
  /// Adapter maintainer contact.
  #[serde(default)]
  pub maintainer_email: String,
}

/// Transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
  /// Per-call timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Maximum in-flight exchange calls.
  #[serde(default = "default_max_concurrent")]
  pub max_concurrent: usize,
}

impl Default for TransportConfig {
  fn default() -> Self {
    Self {
      timeout_ms: default_timeout_ms(),
      max_concurrent: default_max_concurrent(),
    }
  }
}

/// Auction server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Bind address for `/openrtb2/auction`, `/live` and `/ready`.
  #[serde(default = "default_server_addr")]
  pub bind_address: String,
  /// How long `/ready` answers 503 before the listener closes on shutdown.
  #[serde(default = "default_drain_ms")]
  pub drain_ms: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_server_addr(),
      drain_ms: default_drain_ms(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_metrics_addr(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bidder_name() -> String {
  "adform_openrtb".to_string()
}

fn default_true() -> bool {
  true
}

fn default_timeout_ms() -> u64 {
  500
}

fn default_max_concurrent() -> usize {
  32
}

fn default_server_addr() -> String {
  "0.0.0.0:8000".to_string()
}

fn default_drain_ms() -> u64 {
  2_000
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}
