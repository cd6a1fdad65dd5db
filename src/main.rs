//! Kalshi Avellaneda Bot — Entry Point
//!
//! Initializes configuration, logging, venue authentication, and the
//! quoting strategy loop. Runs until the horizon elapses or
//! SIGINT/SIGTERM.
//!
//! Wiring sequence:
//! 1. Load .env + config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Load Kalshi credentials (KALSHI_API_KEY_ID, KALSHI_PRIVATE_KEY_PATH)
//!    — a signing setup failure is fatal before the loop ever starts
//! 4. Create signed HTTP client + market-scoped gateway
//! 5. Spawn health/metrics server (/live, /ready, /metrics)
//! 6. Spawn the strategy loop (fetch → compute → reconcile → sleep)
//! 7. Wait for horizon end or SIGINT; SIGINT cancels open orders

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::kalshi::{KalshiAuth, KalshiClient, KalshiClientConfig, KalshiGateway};
use adapters::metrics::{BotMetrics, HealthServer};
use ports::exchange::ExchangeGateway;
use ports::telemetry::{NoopObserver, StrategyObserver};
use usecases::reconciler::OrderReconciler;
use usecases::strategy::StrategyLoop;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load .env and configuration ──────────────────────
    dotenv::dotenv().ok();
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.bot.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        dry_run = config.bot.dry_run,
        ticker = %config.market.ticker,
        side = %config.market.trade_side,
        "Starting Kalshi Avellaneda bot"
    );

    // ── 3. Shutdown signal channels ─────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let (ready_tx, ready_rx) = watch::channel(true);

    // ── 4. Load Kalshi credentials and build the gateway ────
    let auth = Arc::new(
        KalshiAuth::from_env().context("Failed to load Kalshi credentials from env")?,
    );

    let client_config = KalshiClientConfig {
        base_url: config.api.base_url.clone(),
        timeout: Duration::from_millis(config.api.timeout_ms),
    };
    let client = Arc::new(
        KalshiClient::new(Arc::clone(&auth), client_config)
            .context("Failed to create Kalshi client")?,
    );
    let gateway = Arc::new(KalshiGateway::new(
        Arc::clone(&client),
        config.market.ticker.clone(),
    ));

    // Startup sanity check: credentials must round-trip before quoting.
    match gateway.get_balance().await {
        Ok(cents) => info!(balance_cents = cents, "Account balance fetched"),
        Err(e) => warn!(error = %e, "Balance check failed — continuing anyway"),
    }

    // ── 5. Metrics + health server ──────────────────────────
    let metrics = Arc::new(BotMetrics::new().context("Failed to register metrics")?);
    let observer: Arc<dyn StrategyObserver> = if config.metrics.enabled {
        Arc::clone(&metrics) as Arc<dyn StrategyObserver>
    } else {
        Arc::new(NoopObserver)
    };

    let health_handle = if config.metrics.enabled {
        let server = HealthServer::new(
            ready_rx,
            Arc::clone(&metrics),
            config.metrics.bind_address.clone(),
        );
        Some(tokio::spawn(server.run()))
    } else {
        None
    };

    // ── 6. Wire and spawn the strategy loop ─────────────────
    let model_params = config
        .model
        .to_model_parameters(config.market.trade_side);
    let model = domain::quote::QuoteModel::new(model_params);

    let reconciler = OrderReconciler::new(
        Arc::clone(&gateway),
        config.market.trade_side,
        config.model.order_expiration_secs,
        config.bot.dry_run,
    );

    let strategy = StrategyLoop::new(
        Arc::clone(&gateway),
        model,
        reconciler,
        Duration::from_secs_f64(config.model.tick_interval_secs),
        observer,
    );

    if config.bot.dry_run {
        warn!("Dry-run mode — quotes computed but NO orders placed or cancelled");
    }

    let strategy_shutdown = shutdown_tx.subscribe();
    let mut strategy_handle = tokio::spawn(async move {
        strategy.run(strategy_shutdown).await
    });

    info!("All tasks spawned — bot is running");

    // ── 7. Wait for horizon end or SIGINT ───────────────────
    let interrupted = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
            true
        }
        result = &mut strategy_handle => {
            match result {
                Ok(Ok(())) => info!("Strategy loop completed"),
                Ok(Err(e)) => warn!(error = %e, "Strategy loop failed"),
                Err(e) => warn!(error = %e, "Strategy task panicked"),
            }
            false
        }
    };

    // Mark readiness 503 before touching the book.
    let _ = ready_tx.send(false);

    if interrupted {
        let _ = shutdown_tx.send(());

        // Let the in-flight tick drain before cleanup lists the book:
        // a tick mid-reconcile can still place orders, and cancelling
        // before the loop stops would leave those resting at exit.
        let _ = tokio::time::timeout(Duration::from_secs(30), &mut strategy_handle).await;

        // Cancel whatever is still resting on our ticker. On a natural
        // horizon end this is skipped: resting orders carry a venue-side
        // TTL and expire on their own.
        if !config.bot.dry_run {
            cancel_open_orders(gateway.as_ref()).await;
        }
    }

    if let Some(handle) = health_handle {
        handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}

/// Best-effort cancellation of all resting orders on the configured
/// market. Failures are logged, not propagated — the process is
/// exiting either way.
async fn cancel_open_orders<G: ExchangeGateway>(gateway: &G) {
    info!("Cancelling open orders...");
    let orders = match gateway.get_orders().await {
        Ok(orders) => orders,
        Err(e) => {
            warn!(error = %e, "Could not list open orders for cleanup");
            return;
        }
    };

    let mut cancelled = 0usize;
    for order in &orders {
        match gateway.cancel_order(&order.order_id).await {
            Ok(true) => cancelled += 1,
            Ok(false) => warn!(order_id = %order.order_id, "Venue declined cancel"),
            Err(e) => warn!(order_id = %order.order_id, error = %e, "Cancel failed"),
        }
    }
    info!(cancelled, total = orders.len(), "Open orders cancelled");
}
