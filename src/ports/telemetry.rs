//! Telemetry Port - Strategy Observability Interface
//!
//! Explicit observability seam passed into the strategy loop at
//! construction. No component reaches for a process-wide metrics
//! handle; the Prometheus adapter implements this trait and tests
//! plug in `NoopObserver`.

use crate::domain::market::Quote;

/// Observer for strategy loop events.
pub trait StrategyObserver: Send + Sync + 'static {
    /// A tick started at `t` seconds into the horizon.
    fn tick_started(&self, t: f64);

    /// A quote was computed this tick.
    fn quote_computed(&self, quote: &Quote, reservation_price: f64, inventory: i64);

    /// A reconciliation pass finished with these outcome counts.
    fn orders_reconciled(&self, cancelled: u32, placed: u32, skipped: u32);

    /// A gateway call failed during the named operation.
    fn gateway_error(&self, operation: &'static str);
}

/// Observer that records nothing. Default for unit tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StrategyObserver for NoopObserver {
    fn tick_started(&self, _t: f64) {}
    fn quote_computed(&self, _quote: &Quote, _reservation_price: f64, _inventory: i64) {}
    fn orders_reconciled(&self, _cancelled: u32, _placed: u32, _skipped: u32) {}
    fn gateway_error(&self, _operation: &'static str) {}
}
