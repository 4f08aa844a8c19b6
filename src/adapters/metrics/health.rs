//! Health Check Routes - Liveness and Readiness Probes
//!
//! Exposes /live and /ready via axum 0.7. Readiness flips to 503 as soon
//! as shutdown starts so load balancers drain the instance first.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;

/// Shared health state polled by readiness probes.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Whether the service accepts auctions.
    accepting: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a new health state (ready by default).
    pub fn new() -> Self {
        Self {
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Check if the service is ready to take traffic.
    pub fn is_ready(&self) -> bool {
        self.accepting.load(Ordering::Relaxed)
    }

    /// Stop advertising readiness (graceful shutdown).
    pub fn mark_draining(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Router serving `/live` and `/ready`.
pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: returns 200 until shutdown begins.
async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draining_clears_readiness() {
        let state = HealthState::new();
        let clone = state.clone();
        assert!(clone.is_ready());
        state.mark_draining();
        assert!(!clone.is_ready());
    }
}
