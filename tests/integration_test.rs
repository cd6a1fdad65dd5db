//! Integration Tests - Reconciler and Strategy Loop
//!
//! Tests the interaction between usecases, ports, and a mocked venue
//! gateway. Uses mockall for trait mocking and tokio::test for async
//! tests.

use std::sync::Arc;
use std::time::Duration;

use mockall::mock;
use mockall::predicate::*;

use kalshi_avellaneda_bot::domain::market::{
    MarketState, OpenOrder, OrderAction, OrderRequest, Quote, Side,
};
use kalshi_avellaneda_bot::domain::quote::{ModelParameters, QuoteModel};
use kalshi_avellaneda_bot::ports::exchange::{ExchangeGateway, GatewayError, GatewayResult};
use kalshi_avellaneda_bot::ports::telemetry::NoopObserver;
use kalshi_avellaneda_bot::usecases::reconciler::{OrderReconciler, ReconcileSummary};
use kalshi_avellaneda_bot::usecases::strategy::StrategyLoop;

// ---- Mock Definitions ----

mock! {
    pub Gateway {}

    #[async_trait::async_trait]
    impl kalshi_avellaneda_bot::ports::exchange::ExchangeGateway for Gateway {
        async fn get_price(&self) -> GatewayResult<MarketState>;
        async fn get_position(&self) -> GatewayResult<i64>;
        async fn get_orders(&self) -> GatewayResult<Vec<OpenOrder>>;
        async fn place_order(&self, request: &OrderRequest) -> GatewayResult<String>;
        async fn cancel_order(&self, order_id: &str) -> GatewayResult<bool>;
    }
}

// ---- Helpers ----

fn quote() -> Quote {
    Quote {
        bid_price: 0.48,
        ask_price: 0.52,
        buy_size: 100,
        sell_size: 10,
    }
}

fn open_order(id: &str, action: OrderAction, price: f64, remaining: u32) -> OpenOrder {
    OpenOrder {
        order_id: id.to_string(),
        side: Side::Yes,
        action,
        price,
        remaining_size: remaining,
    }
}

fn reconciler(gateway: MockGateway) -> OrderReconciler<MockGateway> {
    OrderReconciler::new(Arc::new(gateway), Side::Yes, 120, false)
}

fn mid(price: f64) -> MarketState {
    MarketState {
        yes_mid: price,
        no_mid: 1.0 - price,
    }
}

// ---- Reconciler Tests ----

#[tokio::test]
async fn test_idempotent_when_both_sides_already_match() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| {
        Ok(vec![
            open_order("bid-1", OrderAction::Buy, 0.48, 100),
            open_order("ask-1", OrderAction::Sell, 0.52, 10),
        ])
    });
    // No cancel/place/price expectations: any such call panics the mock.

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary, ReconcileSummary::default());
}

#[tokio::test]
async fn test_near_price_match_within_one_cent_is_kept() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| {
        Ok(vec![
            open_order("bid-1", OrderAction::Buy, 0.485, 100),
            open_order("ask-1", OrderAction::Sell, 0.515, 10),
        ])
    });

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary.cancelled, 0);
    assert_eq!(summary.placed, 0);
}

#[tokio::test]
async fn test_extraneous_orders_cancelled_first_match_kept() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| {
        Ok(vec![
            // Stale price: cancelled.
            open_order("bid-stale", OrderAction::Buy, 0.40, 100),
            // Matches: kept.
            open_order("bid-good", OrderAction::Buy, 0.48, 100),
            // Duplicate match after the keep: still cancelled.
            open_order("bid-dupe", OrderAction::Buy, 0.48, 100),
            open_order("ask-good", OrderAction::Sell, 0.52, 10),
        ])
    });
    gateway
        .expect_cancel_order()
        .with(eq("bid-stale"))
        .times(1)
        .returning(|_| Ok(true));
    gateway
        .expect_cancel_order()
        .with(eq("bid-dupe"))
        .times(1)
        .returning(|_| Ok(true));

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary.cancelled, 2);
    assert_eq!(summary.placed, 0);
}

#[tokio::test]
async fn test_wrong_size_order_replaced() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| {
        Ok(vec![
            // Right price, wrong remaining size: cancel and replace.
            open_order("bid-small", OrderAction::Buy, 0.48, 40),
            open_order("ask-good", OrderAction::Sell, 0.52, 10),
        ])
    });
    gateway
        .expect_cancel_order()
        .with(eq("bid-small"))
        .times(1)
        .returning(|_| Ok(true));
    gateway
        .expect_get_price()
        .times(1)
        .returning(|| Ok(mid(0.50)));
    gateway
        .expect_place_order()
        .withf(|r| {
            r.action == OrderAction::Buy
                && r.side == Side::Yes
                && (r.price - 0.48).abs() < 1e-9
                && r.count == 100
                && r.expiration_ts.is_some()
        })
        .times(1)
        .returning(|_| Ok("new-bid".to_string()));

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary.cancelled, 1);
    assert_eq!(summary.placed, 1);
}

#[tokio::test]
async fn test_maker_guard_blocks_crossing_placement() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| Ok(vec![]));
    // Live mid dropped to 0.45: the 0.48 bid would cross, the 0.52
    // ask still rests passively.
    gateway
        .expect_get_price()
        .times(2)
        .returning(|| Ok(mid(0.45)));
    gateway
        .expect_place_order()
        .withf(|r| r.action == OrderAction::Sell)
        .times(1)
        .returning(|_| Ok("ask-new".to_string()));

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary.placed, 1);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn test_at_most_one_placement_per_side() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| Ok(vec![]));
    gateway
        .expect_get_price()
        .times(2)
        .returning(|| Ok(mid(0.50)));
    gateway
        .expect_place_order()
        .withf(|r| r.action == OrderAction::Buy)
        .times(1)
        .returning(|_| Ok("bid-new".to_string()));
    gateway
        .expect_place_order()
        .withf(|r| r.action == OrderAction::Sell)
        .times(1)
        .returning(|_| Ok("ask-new".to_string()));

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary.placed, 2);
}

#[tokio::test]
async fn test_cancel_failure_absorbed_and_pass_continues() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| {
        Ok(vec![
            open_order("bid-stale", OrderAction::Buy, 0.30, 5),
            open_order("ask-good", OrderAction::Sell, 0.52, 10),
        ])
    });
    gateway.expect_cancel_order().times(1).returning(|_| {
        Err(GatewayError::Rejected {
            status: 503,
            body: "unavailable".to_string(),
        })
    });
    // The failed cancel must not stop the buy-side replacement.
    gateway
        .expect_get_price()
        .times(1)
        .returning(|| Ok(mid(0.50)));
    gateway
        .expect_place_order()
        .times(1)
        .returning(|_| Ok("bid-new".to_string()));

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary.cancelled, 0);
    assert_eq!(summary.placed, 1);
}

#[tokio::test]
async fn test_order_list_failure_skips_reconciliation() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| {
        Err(GatewayError::Rejected {
            status: 500,
            body: String::new(),
        })
    });

    let summary = reconciler(gateway).reconcile(&quote()).await;
    assert_eq!(summary, ReconcileSummary::default());
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_orders().times(1).returning(|| {
        Ok(vec![open_order("bid-stale", OrderAction::Buy, 0.30, 5)])
    });
    gateway
        .expect_get_price()
        .times(2)
        .returning(|| Ok(mid(0.50)));
    // No cancel_order/place_order expectations: calls would panic.

    let reconciler = OrderReconciler::new(Arc::new(gateway), Side::Yes, 120, true);
    let summary = reconciler.reconcile(&quote()).await;
    // The summary feeds the order counters, so dry-run intents must
    // not show up as sent orders.
    assert_eq!(summary.cancelled, 0);
    assert_eq!(summary.placed, 0);
    assert_eq!(summary.skipped, 0);
}

// ---- Strategy Loop Tests ----

fn short_horizon_params() -> ModelParameters {
    ModelParameters {
        gamma: 0.1,
        k: 1.5,
        sigma: 0.02,
        horizon_secs: 0.25,
        max_position: 100,
        min_spread: 0.01,
        position_limit_buffer: 0.1,
        inventory_skew_factor: 0.01,
        trade_side: Side::Yes,
        order_expiration_secs: 120,
    }
}

#[tokio::test]
async fn test_strategy_runs_full_tick_and_stops_at_horizon() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_price()
        .returning(|| Ok(mid(0.50)));
    gateway.expect_get_position().returning(|| Ok(0));
    gateway.expect_get_orders().returning(|| Ok(vec![]));
    gateway
        .expect_place_order()
        .returning(|_| Ok("oid".to_string()));

    let gateway = Arc::new(gateway);
    let reconciler = OrderReconciler::new(Arc::clone(&gateway), Side::Yes, 120, false);
    let strategy = StrategyLoop::new(
        Arc::clone(&gateway),
        QuoteModel::new(short_horizon_params()),
        reconciler,
        Duration::from_millis(100),
        Arc::new(NoopObserver),
    );

    let (_tx, rx) = tokio::sync::broadcast::channel::<()>(1);
    // Terminates on its own once elapsed >= horizon.
    tokio::time::timeout(Duration::from_secs(5), strategy.run(rx))
        .await
        .expect("loop must stop at the horizon")
        .expect("loop must exit cleanly");
}

#[tokio::test]
async fn test_strategy_skips_tick_on_price_failure() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_price().returning(|| {
        Err(GatewayError::Rejected {
            status: 500,
            body: String::new(),
        })
    });
    // Position and orders must never be fetched when the mid is
    // unavailable this tick.

    let gateway = Arc::new(gateway);
    let reconciler = OrderReconciler::new(Arc::clone(&gateway), Side::Yes, 120, false);
    let strategy = StrategyLoop::new(
        Arc::clone(&gateway),
        QuoteModel::new(short_horizon_params()),
        reconciler,
        Duration::from_millis(100),
        Arc::new(NoopObserver),
    );

    let (_tx, rx) = tokio::sync::broadcast::channel::<()>(1);
    tokio::time::timeout(Duration::from_secs(5), strategy.run(rx))
        .await
        .expect("loop must keep running through failures until the horizon")
        .expect("loop must exit cleanly");
}

/// Gateway that records call ordering and stalls `get_orders`, so a
/// shutdown signal can land while a tick is mid-reconcile.
struct SlowBookGateway {
    events: std::sync::Mutex<Vec<&'static str>>,
}

impl SlowBookGateway {
    fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn record(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait::async_trait]
impl kalshi_avellaneda_bot::ports::exchange::ExchangeGateway for SlowBookGateway {
    async fn get_price(&self) -> GatewayResult<MarketState> {
        Ok(mid(0.50))
    }

    async fn get_position(&self) -> GatewayResult<i64> {
        Ok(0)
    }

    async fn get_orders(&self) -> GatewayResult<Vec<OpenOrder>> {
        self.record("list");
        tokio::time::sleep(Duration::from_millis(150)).await;
        Ok(vec![])
    }

    async fn place_order(&self, _request: &OrderRequest) -> GatewayResult<String> {
        self.record("place");
        Ok("oid".to_string())
    }

    async fn cancel_order(&self, _order_id: &str) -> GatewayResult<bool> {
        self.record("cancel");
        Ok(true)
    }
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_tick_before_cleanup() {
    let gateway = Arc::new(SlowBookGateway::new());
    let reconciler = OrderReconciler::new(Arc::clone(&gateway), Side::Yes, 120, false);

    let mut params = short_horizon_params();
    params.horizon_secs = 3600.0;
    let strategy = StrategyLoop::new(
        Arc::clone(&gateway),
        QuoteModel::new(params),
        reconciler,
        Duration::from_millis(50),
        Arc::new(NoopObserver),
    );

    let (tx, rx) = tokio::sync::broadcast::channel::<()>(1);
    let mut handle = tokio::spawn(async move { strategy.run(rx).await });

    // Signal while the first tick's order fetch is still stalled.
    tokio::time::sleep(Duration::from_millis(20)).await;
    tx.send(()).expect("send shutdown");

    // The entry point's sequence: drain the loop, then list the book
    // for cleanup. The in-flight tick is free to finish placing.
    tokio::time::timeout(Duration::from_secs(5), &mut handle)
        .await
        .expect("loop must drain")
        .expect("task must not panic")
        .expect("loop must exit cleanly");
    gateway.record("cleanup");
    let _ = gateway.get_orders().await;

    // Every placement must precede the cleanup snapshot.
    let events = gateway.events.lock().unwrap();
    let cleanup_at = events
        .iter()
        .position(|e| *e == "cleanup")
        .expect("cleanup marker recorded");
    assert!(
        events
            .iter()
            .enumerate()
            .all(|(i, e)| *e != "place" || i < cleanup_at),
        "order placed after cleanup snapshotted the book: {events:?}"
    );
    assert!(
        events[..cleanup_at].contains(&"place"),
        "in-flight tick should have placed before draining: {events:?}"
    );
}

#[tokio::test]
async fn test_strategy_stops_on_shutdown_signal() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_price().returning(|| Ok(mid(0.50)));
    gateway.expect_get_position().returning(|| Ok(0));
    gateway.expect_get_orders().returning(|| Ok(vec![]));
    gateway
        .expect_place_order()
        .returning(|_| Ok("oid".to_string()));

    let mut params = short_horizon_params();
    params.horizon_secs = 3600.0;

    let gateway = Arc::new(gateway);
    let reconciler = OrderReconciler::new(Arc::clone(&gateway), Side::Yes, 120, false);
    let strategy = StrategyLoop::new(
        Arc::clone(&gateway),
        QuoteModel::new(params),
        reconciler,
        Duration::from_millis(50),
        Arc::new(NoopObserver),
    );

    let (tx, rx) = tokio::sync::broadcast::channel::<()>(1);
    let handle = tokio::spawn(async move { strategy.run(rx).await });

    tokio::time::sleep(Duration::from_millis(120)).await;
    tx.send(()).expect("send shutdown");

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop must honor shutdown")
        .expect("task must not panic")
        .expect("loop must exit cleanly");
}
