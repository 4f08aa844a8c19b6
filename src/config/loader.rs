//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "BIDDER_CONFIG";

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Config path from `BIDDER_CONFIG`, falling back to `config.toml`.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    bidder = %config.bidder.name,
    endpoint = %config.bidder.endpoint,
    timeout_ms = config.transport.timeout_ms,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty bidder name
/// - An absolute http(s) endpoint URL
/// - Positive transport limits
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.bidder.name.trim().is_empty(),
    "Bidder name must not be empty"
  );

  let endpoint = reqwest::Url::parse(&config.bidder.endpoint)
    .with_context(|| format!("Bidder endpoint is not a valid URL: {}", config.bidder.endpoint))?;
  anyhow::ensure!(
    matches!(endpoint.scheme(), "http" | "https"),
    "Bidder endpoint must be http or https, got {}",
    endpoint.scheme()
  );

  anyhow::ensure!(
    config.transport.timeout_ms > 0,
    "transport.timeout_ms must be positive"
  );
  anyhow::ensure!(
    config.transport.max_concurrent > 0,
    "transport.max_concurrent must be positive"
  );

  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "server.bind_address must not be empty"
  );

  Ok(())
}
