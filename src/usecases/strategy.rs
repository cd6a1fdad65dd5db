//! Strategy Loop - Fetch, Compute, Reconcile, Sleep
//!
//! Drives periodic ticks over a fixed horizon T:
//! 1. Fetch mid prices and net position from the venue
//! 2. Compute the desired quote via the Avellaneda-Stoikov model
//! 3. Reconcile the venue's live orders against it
//! 4. Sleep for the tick interval
//!
//! Entirely sequential: the next tick's fetch only begins after this
//! tick's sleep completes. A gateway failure on either fetch skips the
//! rest of the tick — the loop keeps running until the horizon elapses
//! or a shutdown signal arrives. No retry, no backoff.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::domain::quote::QuoteModel;
use crate::ports::exchange::ExchangeGateway;
use crate::ports::telemetry::StrategyObserver;

use super::reconciler::OrderReconciler;

/// The fetch-compute-reconcile-sleep loop over one market.
pub struct StrategyLoop<G: ExchangeGateway> {
    /// Venue gateway.
    gateway: Arc<G>,
    /// Pure quoting engine.
    model: QuoteModel,
    /// Order reconciler.
    reconciler: OrderReconciler<G>,
    /// Tick cadence.
    dt: Duration,
    /// Observability seam, injected at construction.
    observer: Arc<dyn StrategyObserver>,
}

impl<G: ExchangeGateway> StrategyLoop<G> {
    /// Wire up a strategy loop.
    pub fn new(
        gateway: Arc<G>,
        model: QuoteModel,
        reconciler: OrderReconciler<G>,
        dt: Duration,
        observer: Arc<dyn StrategyObserver>,
    ) -> Self {
        Self {
            gateway,
            model,
            reconciler,
            dt,
            observer,
        }
    }

    /// Run ticks until the horizon elapses or shutdown is signalled.
    #[instrument(skip(self, shutdown_rx), name = "strategy_loop")]
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let start = Instant::now();
        let horizon = self.model.params().horizon_secs;

        info!(
            horizon_secs = horizon,
            tick_secs = self.dt.as_secs_f64(),
            side = %self.model.params().trade_side,
            "Starting Avellaneda quoting loop"
        );

        while start.elapsed().as_secs_f64() < horizon {
            let t = start.elapsed().as_secs_f64();
            self.tick(t).await;

            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Strategy loop received shutdown signal");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.dt) => {}
            }
        }

        info!("Avellaneda quoting loop finished: horizon reached");
        Ok(())
    }

    /// One fetch-compute-reconcile pass at elapsed time `t`.
    async fn tick(&self, t: f64) {
        self.observer.tick_started(t);
        info!(t = format!("{t:.2}"), "Running quoting tick");

        let state = match self.gateway.get_price().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Failed to fetch mid prices, skipping tick");
                self.observer.gateway_error("get_price");
                return;
            }
        };
        let mid = state.mid(self.model.params().trade_side);

        let inventory = match self.gateway.get_position().await {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Failed to fetch position, skipping tick");
                self.observer.gateway_error("get_position");
                return;
            }
        };

        let reservation = self.model.reservation_price(mid, inventory, t);
        let quote = self.model.quote(mid, inventory, t);

        info!(
            mid = format!("{mid:.4}"),
            inventory,
            reservation = format!("{reservation:.4}"),
            bid = format!("{:.4}", quote.bid_price),
            ask = format!("{:.4}", quote.ask_price),
            buy_size = quote.buy_size,
            sell_size = quote.sell_size,
            "Computed desired quote"
        );
        self.observer.quote_computed(&quote, reservation, inventory);

        let summary = self.reconciler.reconcile(&quote).await;
        self.observer
            .orders_reconciled(summary.cancelled, summary.placed, summary.skipped);
    }
}
