//! Prometheus Metrics Registry - Quoting Observability
//!
//! Registers the metrics the strategy loop reports through the
//! `StrategyObserver` port: tick counts, order lifecycle counters,
//! gateway failures by operation, and the current quote/inventory
//! gauges. All metrics follow the `kalshi_bot_*` naming convention.

use prometheus::{Gauge, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

use crate::domain::market::Quote;
use crate::ports::telemetry::StrategyObserver;

/// Centralized Prometheus metrics for the quoting bot.
pub struct BotMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Total strategy ticks run.
    pub ticks: IntCounter,
    /// Total orders placed.
    pub orders_placed: IntCounter,
    /// Total orders cancelled.
    pub orders_cancelled: IntCounter,
    /// Placements skipped by the maker-only guard.
    pub orders_skipped: IntCounter,
    /// Gateway call failures by operation.
    pub gateway_errors: IntCounterVec,
    /// Current net inventory in contracts.
    pub net_inventory: IntGauge,
    /// Desired bid price this tick.
    pub bid_price: Gauge,
    /// Desired ask price this tick.
    pub ask_price: Gauge,
    /// Reservation price this tick.
    pub reservation_price: Gauge,
    /// Elapsed seconds into the horizon.
    pub elapsed_secs: Gauge,
}

impl BotMetrics {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let ticks = IntCounter::new("kalshi_bot_ticks_total", "Total strategy ticks run")?;
        let orders_placed =
            IntCounter::new("kalshi_bot_orders_placed_total", "Total orders placed")?;
        let orders_cancelled = IntCounter::new(
            "kalshi_bot_orders_cancelled_total",
            "Total orders cancelled",
        )?;
        let orders_skipped = IntCounter::new(
            "kalshi_bot_orders_skipped_total",
            "Placements skipped by the maker-only guard",
        )?;
        let gateway_errors = IntCounterVec::new(
            Opts::new(
                "kalshi_bot_gateway_errors_total",
                "Gateway call failures by operation",
            ),
            &["operation"],
        )?;
        let net_inventory = IntGauge::new(
            "kalshi_bot_net_inventory_contracts",
            "Current net inventory in contracts",
        )?;
        let bid_price = Gauge::new("kalshi_bot_bid_price", "Desired bid price this tick")?;
        let ask_price = Gauge::new("kalshi_bot_ask_price", "Desired ask price this tick")?;
        let reservation_price = Gauge::new(
            "kalshi_bot_reservation_price",
            "Inventory-adjusted reservation price this tick",
        )?;
        let elapsed_secs = Gauge::new(
            "kalshi_bot_elapsed_secs",
            "Elapsed seconds into the trading horizon",
        )?;

        registry.register(Box::new(ticks.clone()))?;
        registry.register(Box::new(orders_placed.clone()))?;
        registry.register(Box::new(orders_cancelled.clone()))?;
        registry.register(Box::new(orders_skipped.clone()))?;
        registry.register(Box::new(gateway_errors.clone()))?;
        registry.register(Box::new(net_inventory.clone()))?;
        registry.register(Box::new(bid_price.clone()))?;
        registry.register(Box::new(ask_price.clone()))?;
        registry.register(Box::new(reservation_price.clone()))?;
        registry.register(Box::new(elapsed_secs.clone()))?;

        Ok(Self {
            registry,
            ticks,
            orders_placed,
            orders_cancelled,
            orders_skipped,
            gateway_errors,
            net_inventory,
            bid_price,
            ask_price,
            reservation_price,
            elapsed_secs,
        })
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        use prometheus::{Encoder, TextEncoder};
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

impl StrategyObserver for BotMetrics {
    fn tick_started(&self, t: f64) {
        self.ticks.inc();
        self.elapsed_secs.set(t);
    }

    fn quote_computed(&self, quote: &Quote, reservation_price: f64, inventory: i64) {
        self.bid_price.set(quote.bid_price);
        self.ask_price.set(quote.ask_price);
        self.reservation_price.set(reservation_price);
        self.net_inventory.set(inventory);
    }

    fn orders_reconciled(&self, cancelled: u32, placed: u32, skipped: u32) {
        self.orders_cancelled.inc_by(u64::from(cancelled));
        self.orders_placed.inc_by(u64::from(placed));
        self.orders_skipped.inc_by(u64::from(skipped));
    }

    fn gateway_error(&self, operation: &'static str) {
        self.gateway_errors.with_label_values(&[operation]).inc();
    }
}
