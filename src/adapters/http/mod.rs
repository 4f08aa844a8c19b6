//! Auction HTTP Server
//!
//! `POST /openrtb2/auction` decodes an OpenRTB request, runs it through
//! the bidder and answers with an OpenRTB response carrying the bidder's
//! seat and errors. Health probes are merged into the same router.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::adapters::metrics::{HealthState, MetricsRegistry, health};
use crate::domain::bidder::ExtraRequestInfo;
use crate::domain::openrtb::BidRequest;
use crate::ports::bidder::Bidder;
use crate::ports::transport::HttpTransport;
use crate::usecases::auction::BidderRunner;

/// Path of the auction endpoint.
pub const AUCTION_PATH: &str = "/openrtb2/auction";

/// Shared state of the auction handler.
pub struct AuctionState<B: Bidder, T: HttpTransport> {
    pub runner: Arc<BidderRunner<B, T>>,
    /// Seat name reported in responses and metric labels.
    pub seat: Arc<str>,
    pub metrics: Option<Arc<MetricsRegistry>>,
}

impl<B: Bidder, T: HttpTransport> Clone for AuctionState<B, T> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            seat: Arc::clone(&self.seat),
            metrics: self.metrics.clone(),
        }
    }
}

/// Full router: auction endpoint plus `/live` and `/ready`.
pub fn router<B: Bidder, T: HttpTransport>(
    state: AuctionState<B, T>,
    health: HealthState,
) -> Router {
    Router::new()
        .route(AUCTION_PATH, post(auction::<B, T>))
        .with_state(state)
        .merge(health::router(health))
}

/// Serve `app` on `listener` until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    info!(address = ?listener.local_addr().ok(), "Auction server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    Ok(())
}

/// Flip readiness to 503, keep serving for `grace`, then signal shutdown.
pub async fn drain(
    health: &HealthState,
    shutdown_tx: &broadcast::Sender<()>,
    grace: Duration,
) {
    health.mark_draining();
    info!(grace = ?grace, "Readiness dropped, draining");
    tokio::time::sleep(grace).await;
    let _ = shutdown_tx.send(());
}

#[instrument(skip_all)]
async fn auction<B: Bidder, T: HttpTransport>(
    State(state): State<AuctionState<B, T>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: BidRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return reject(&state, format!("Invalid request format: {e}")),
    };

    if request.id.is_empty() {
        return reject(&state, "request.id must be a non-empty string".to_string());
    }
    if request.imp.is_empty() {
        return reject(&state, "request.imp must contain at least one element".to_string());
    }

    let extra = ExtraRequestInfo {
        global_privacy_control: headers
            .get("Sec-GPC")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "1"),
    };

    let started = Instant::now();
    let outcome = state.runner.run(&request, &extra).await;
    let latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    if let Some(metrics) = &state.metrics {
        metrics.observe_outcome(&state.seat, &outcome, latency_us);
    }

    Json(outcome.into_bid_response(&request.id, &state.seat)).into_response()
}

fn reject<B: Bidder, T: HttpTransport>(state: &AuctionState<B, T>, message: String) -> Response {
    warn!(reason = %message, "Rejecting auction request");
    if let Some(metrics) = &state.metrics {
        metrics.malformed_requests.inc();
    }
    (StatusCode::BAD_REQUEST, message).into_response()
}
