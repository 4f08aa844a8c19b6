//! Adform OpenRTB Bidder — Entry Point
//!
//! Wires the Adform adapter into a minimal auction host and serves it
//! until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (or `$BIDDER_CONFIG`) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Build the adapter from `[bidder]` and the reqwest transport
//! 4. Spawn the Prometheus metrics server (if enabled)
//! 5. Serve `/openrtb2/auction`, `/live` and `/ready`
//! 6. Wait for SIGINT → drain readiness → stop servers

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use adform_openrtb_bidder::adapters::adform::AdformOpenRtbAdapter;
use adform_openrtb_bidder::adapters::http::{self, AuctionState};
use adform_openrtb_bidder::adapters::metrics::{HealthState, MetricsRegistry};
use adform_openrtb_bidder::adapters::transport::{ReqwestTransport, ReqwestTransportConfig};
use adform_openrtb_bidder::config;
use adform_openrtb_bidder::usecases::auction::BidderRunner;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config(&config::loader::config_path())
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.service.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        bidder = %config.bidder.name,
        endpoint = %config.bidder.endpoint,
        "Starting Adform OpenRTB bidder"
    );

    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = HealthState::new();

    // ── 3. Adapter + transport ──────────────────────────────
    let adapter = Arc::new(AdformOpenRtbAdapter::from_config(&config.bidder));
    let transport = Arc::new(
        ReqwestTransport::new(ReqwestTransportConfig::from(&config.transport))
            .context("Failed to create exchange transport")?,
    );
    let runner = Arc::new(BidderRunner::new(adapter, transport));

    // ── 4. Metrics server ───────────────────────────────────
    let metrics = if config.metrics.enabled {
        let registry = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
        let metrics_shutdown = shutdown_tx.subscribe();
        let bind = config.metrics.bind_address.clone();
        let serving = Arc::clone(&registry);
        tokio::spawn(async move {
            if let Err(e) = serving.serve(bind, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        });
        Some(registry)
    } else {
        None
    };

    // ── 5. Auction server ───────────────────────────────────
    let state = AuctionState {
        runner,
        seat: Arc::from(config.bidder.name.as_str()),
        metrics,
    };
    let app = http::router(state, health.clone());
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;

    let server_shutdown = shutdown_tx.subscribe();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = http::serve(listener, app, server_shutdown).await {
            error!(error = %e, "Auction server failed");
        }
    });

    info!("Bidder is serving auctions");

    // ── 6. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("SIGINT received, initiating graceful shutdown");

    http::drain(
        &health,
        &shutdown_tx,
        Duration::from_millis(config.server.drain_ms),
    )
    .await;

    let _ = tokio::time::timeout(Duration::from_secs(10), server_handle).await;

    info!("Shutdown complete");
    Ok(())
}
