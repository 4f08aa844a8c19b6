//! Prometheus Metrics Registry - Auction Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers auction counts and latency, exchange status codes, bids
//! by media type and errors by bucket.

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::usecases::auction::SeatOutcome;

/// Centralized Prometheus metrics for the bidder service.
///
/// All metrics follow the naming convention `adform_bidder_*` and carry
/// a `bidder` label so several seats can share one dashboard.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Auctions handled.
    pub auctions: IntCounterVec,
    /// Auction wall time histogram (microseconds).
    pub auction_latency_us: HistogramVec,
    /// Exchange calls by HTTP status (or `transport_error`).
    pub exchange_calls: IntCounterVec,
    /// Bids returned by media type.
    pub bids: IntCounterVec,
    /// Errors by bucket.
    pub errors: IntCounterVec,
    /// Auction requests rejected before reaching the bidder.
    pub malformed_requests: IntCounter,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let auctions = IntCounterVec::new(
            Opts::new("adform_bidder_auctions_total", "Total auctions handled"),
            &["bidder"],
        )?;

        let auction_latency_us = HistogramVec::new(
            HistogramOpts::new(
                "adform_bidder_auction_latency_us",
                "Auction wall time in microseconds",
            )
            .buckets(vec![
                1_000.0, 5_000.0, 10_000.0, 50_000.0, 100_000.0, 250_000.0, 500_000.0, 1_000_000.0,
            ]),
            &["bidder"],
        )?;

        let exchange_calls = IntCounterVec::new(
            Opts::new(
                "adform_bidder_exchange_calls_total",
                "Exchange calls by HTTP status",
            ),
            &["bidder", "status"],
        )?;

        let bids = IntCounterVec::new(
            Opts::new("adform_bidder_bids_total", "Bids returned by media type"),
            &["bidder", "bid_type"],
        )?;

        let errors = IntCounterVec::new(
            Opts::new("adform_bidder_errors_total", "Bidder errors by kind"),
            &["bidder", "kind"],
        )?;

        let malformed_requests = IntCounter::new(
            "adform_bidder_malformed_requests_total",
            "Auction requests that failed to decode",
        )?;

        // Register all metrics
        registry.register(Box::new(auctions.clone()))?;
        registry.register(Box::new(auction_latency_us.clone()))?;
        registry.register(Box::new(exchange_calls.clone()))?;
        registry.register(Box::new(bids.clone()))?;
        registry.register(Box::new(errors.clone()))?;
        registry.register(Box::new(malformed_requests.clone()))?;

        Ok(Self {
            registry,
            auctions,
            auction_latency_us,
            exchange_calls,
            bids,
            errors,
            malformed_requests,
        })
    }

    /// Record everything one auction produced.
    pub fn observe_outcome(&self, bidder: &str, outcome: &SeatOutcome, latency_us: u64) {
        self.auctions.with_label_values(&[bidder]).inc();
        #[allow(clippy::cast_precision_loss)]
        let latency = latency_us as f64;
        self.auction_latency_us
            .with_label_values(&[bidder])
            .observe(latency);

        for call in &outcome.http_calls {
            let status = call
                .status_code
                .map_or_else(|| "transport_error".to_string(), |s| s.to_string());
            self.exchange_calls
                .with_label_values(&[bidder, status.as_str()])
                .inc();
        }
        for bid in &outcome.bids {
            self.bids
                .with_label_values(&[bidder, bid.bid_type.as_str()])
                .inc();
        }
        for err in &outcome.errors {
            self.errors.with_label_values(&[bidder, err.kind()]).inc();
        }
    }

    /// Text exposition of all registered metrics.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move {
                    metrics
                        .render()
                        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
