//! Health and Metrics Server - Liveness, Readiness, /metrics
//!
//! Exposes /live, /ready, and /metrics endpoints via axum for
//! orchestrator probes and Prometheus scraping. Readiness flips to
//! 503 during graceful shutdown so a load balancer stops routing
//! before open orders are cancelled.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::watch;
use tracing::{info, instrument};

use super::prometheus::BotMetrics;

/// Shared state for the probe and metrics handlers.
#[derive(Clone)]
struct ServerState {
    ready: watch::Receiver<bool>,
    metrics: Arc<BotMetrics>,
}

/// Axum-based health and metrics HTTP server.
pub struct HealthServer {
    /// Readiness flag, flipped false during shutdown.
    ready: watch::Receiver<bool>,
    /// Metrics registry rendered at /metrics.
    metrics: Arc<BotMetrics>,
    /// Bind address, e.g. "0.0.0.0:9090".
    bind_address: String,
}

impl HealthServer {
    /// Create a new server.
    pub fn new(
        ready: watch::Receiver<bool>,
        metrics: Arc<BotMetrics>,
        bind_address: String,
    ) -> Self {
        Self {
            ready,
            metrics,
            bind_address,
        }
    }

    /// Serve until the process exits.
    #[instrument(skip(self), fields(address = %self.bind_address))]
    pub async fn run(self) -> anyhow::Result<()> {
        let state = ServerState {
            ready: self.ready,
            metrics: self.metrics,
        };

        let app = Router::new()
            .route("/live", get(|| async { StatusCode::OK }))
            .route("/ready", get(Self::readiness))
            .route("/metrics", get(Self::metrics))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
        info!("Health server listening");
        axum::serve(listener, app).await?;
        Ok(())
    }

    async fn readiness(State(state): State<ServerState>) -> StatusCode {
        if *state.ready.borrow() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }

    async fn metrics(State(state): State<ServerState>) -> impl IntoResponse {
        match state.metrics.render() {
            Ok(body) => (StatusCode::OK, body),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}
