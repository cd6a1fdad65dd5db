//! Order Reconciler - Desired Quote vs Live Book
//!
//! Given the quote computed this tick and the venue's current open
//! orders, decides per action side which orders to cancel and whether
//! to place a new one. Runs buy and sell sides independently.
//!
//! Keep rule: the first order within one cent of the desired price
//! whose remaining size equals the desired size is kept; every other
//! order on that side is cancelled unconditionally. If nothing was
//! kept, a replacement is placed only if it would rest passively
//! against the live mid (maker-only guard).
//!
//! Place and cancel failures are logged and absorbed locally; a tick
//! is never aborted by a gateway error here.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::market::{OpenOrder, OrderAction, OrderRequest, Quote, Side};
use crate::ports::exchange::ExchangeGateway;

/// Price tolerance for keeping an existing order: one cent.
const PRICE_TOLERANCE: f64 = 0.01;

/// Outcome counts for one reconciliation pass, for metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Orders cancelled across both sides.
    pub cancelled: u32,
    /// New orders placed across both sides.
    pub placed: u32,
    /// Placements skipped by the maker-only guard.
    pub skipped: u32,
}

impl ReconcileSummary {
    fn merge(self, other: Self) -> Self {
        Self {
            cancelled: self.cancelled + other.cancelled,
            placed: self.placed + other.placed,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Reconciles the venue's live orders against a desired quote.
pub struct OrderReconciler<G: ExchangeGateway> {
    /// Venue gateway.
    gateway: Arc<G>,
    /// Contract side this strategy quotes.
    trade_side: Side,
    /// TTL attached to every placed order, in seconds.
    order_expiration_secs: i64,
    /// When set, log intended actions but touch nothing.
    dry_run: bool,
}

impl<G: ExchangeGateway> OrderReconciler<G> {
    /// Create a reconciler for one market side.
    pub fn new(
        gateway: Arc<G>,
        trade_side: Side,
        order_expiration_secs: i64,
        dry_run: bool,
    ) -> Self {
        Self {
            gateway,
            trade_side,
            order_expiration_secs,
            dry_run,
        }
    }

    /// Reconcile both action sides against the given quote.
    ///
    /// Fetches the live order list once, partitions it by action for
    /// the configured trade side (venue ordering preserved), and
    /// handles each side independently.
    #[instrument(skip(self, quote), fields(side = %self.trade_side))]
    pub async fn reconcile(&self, quote: &Quote) -> ReconcileSummary {
        let orders = match self.gateway.get_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                warn!(error = %e, "Failed to fetch open orders, skipping reconciliation");
                return ReconcileSummary::default();
            }
        };

        debug!(total = orders.len(), "Retrieved open orders");

        let mut buy_orders = Vec::new();
        let mut sell_orders = Vec::new();
        for order in orders {
            if order.side != self.trade_side {
                continue;
            }
            match order.action {
                OrderAction::Buy => buy_orders.push(order),
                OrderAction::Sell => sell_orders.push(order),
            }
        }

        debug!(
            buys = buy_orders.len(),
            sells = sell_orders.len(),
            "Partitioned orders for trade side"
        );

        let bid = self
            .handle_side(OrderAction::Buy, buy_orders, quote.bid_price, quote.buy_size)
            .await;
        let ask = self
            .handle_side(OrderAction::Sell, sell_orders, quote.ask_price, quote.sell_size)
            .await;

        bid.merge(ask)
    }

    /// Reconcile one action side: keep-or-cancel, then maybe place.
    async fn handle_side(
        &self,
        action: OrderAction,
        orders: Vec<OpenOrder>,
        desired_price: f64,
        desired_size: u32,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let mut keep: Option<&OpenOrder> = None;

        for order in &orders {
            let matches = (order.price - desired_price).abs() < PRICE_TOLERANCE
                && order.remaining_size == desired_size;
            if keep.is_none() && matches {
                // First match wins; the live list order is authoritative.
                info!(
                    order_id = %order.order_id,
                    price = order.price,
                    %action,
                    "Keeping existing order"
                );
                keep = Some(order);
            } else {
                info!(
                    order_id = %order.order_id,
                    price = order.price,
                    %action,
                    "Cancelling extraneous order"
                );
                // Dry-run logs the intent but the summary only counts
                // orders actually sent to the venue.
                if self.dry_run {
                    continue;
                }
                match self.gateway.cancel_order(&order.order_id).await {
                    Ok(true) => summary.cancelled += 1,
                    Ok(false) => warn!(order_id = %order.order_id, "Venue declined cancel"),
                    Err(e) => {
                        warn!(order_id = %order.order_id, error = %e, "Cancel failed")
                    }
                }
            }
        }

        if keep.is_some() {
            return summary;
        }

        // Maker-only guard against the *live* mid, re-fetched at
        // decision time rather than the value the quote was computed
        // from. The observed list may be stale relative to an
        // in-flight cancel from last tick; placing is still bounded
        // to one order per side per tick.
        let mid = match self.gateway.get_price().await {
            Ok(state) => state.mid(self.trade_side),
            Err(e) => {
                warn!(error = %e, %action, "Failed to re-fetch mid, skipping placement");
                return summary;
            }
        };

        let improves = match action {
            OrderAction::Buy => desired_price < mid,
            OrderAction::Sell => desired_price > mid,
        };

        if !improves {
            info!(
                %action,
                desired = desired_price,
                mid,
                "Skipped placement: desired price would cross the book"
            );
            summary.skipped += 1;
            return summary;
        }

        let request = OrderRequest {
            action,
            side: self.trade_side,
            price: desired_price,
            count: desired_size,
            expiration_ts: Some(chrono::Utc::now().timestamp() + self.order_expiration_secs),
        };

        if self.dry_run {
            info!(%action, price = desired_price, size = desired_size, "Dry-run: would place order");
            return summary;
        }

        match self.gateway.place_order(&request).await {
            Ok(order_id) => {
                info!(
                    %order_id,
                    %action,
                    price = desired_price,
                    size = desired_size,
                    "Placed new order"
                );
                summary.placed += 1;
            }
            Err(e) => warn!(%action, error = %e, "Failed to place order"),
        }

        summary
    }
}
