//! Kalshi Gateway — ExchangeGateway Adapter
//!
//! Implements the `ExchangeGateway` port against the Kalshi trade API
//! v2 using the shared signed `KalshiClient`. Scoped to a single
//! market ticker: positions and orders from other markets are filtered
//! out here, never reaching the reconciler.
//!
//! All wire prices are integer cents; conversion to [0, 1]
//! probabilities happens at this boundary and nowhere else.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::market::{MarketState, OpenOrder, OrderAction, OrderRequest, Side};
use crate::ports::exchange::{ExchangeGateway, GatewayError, GatewayResult, OrderId};

use super::client::KalshiClient;
use super::types::{
    ApiOrder, BalanceResponse, CreateOrderRequest, MarketEnvelope, OrderEnvelope,
    OrdersResponse, PositionsResponse,
};

/// Convert a probability to the venue's integer cents.
pub(crate) fn price_to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// Convert venue cents to a probability.
fn cents_to_price(cents: f64) -> f64 {
    cents / 100.0
}

/// Mid of two cent prices, rounded to whole cents in [0, 1] terms.
fn mid_of(bid_cents: f64, ask_cents: f64) -> f64 {
    let mid = (cents_to_price(bid_cents) + cents_to_price(ask_cents)) / 2.0;
    (mid * 100.0).round() / 100.0
}

/// Build the order-creation payload for one request.
///
/// Exactly one of yes_price/no_price is populated, matching the
/// request's side, as integer cents.
pub(crate) fn build_order_payload(
    ticker: &str,
    request: &OrderRequest,
    client_order_id: String,
) -> CreateOrderRequest {
    let cents = price_to_cents(request.price);
    let (yes_price, no_price) = match request.side {
        Side::Yes => (Some(cents), None),
        Side::No => (None, Some(cents)),
    };
    CreateOrderRequest {
        ticker: ticker.to_string(),
        action: request.action.to_string(),
        side: request.side.to_string(),
        count: request.count,
        order_type: "limit".to_string(),
        yes_price,
        no_price,
        expiration_ts: request.expiration_ts,
        client_order_id,
    }
}

fn parse_side(raw: &str) -> Option<Side> {
    match raw {
        "yes" => Some(Side::Yes),
        "no" => Some(Side::No),
        _ => None,
    }
}

fn parse_action(raw: &str) -> Option<OrderAction> {
    match raw {
        "buy" => Some(OrderAction::Buy),
        "sell" => Some(OrderAction::Sell),
        _ => None,
    }
}

/// Decode one venue order into the domain representation.
fn decode_order(raw: &ApiOrder) -> GatewayResult<OpenOrder> {
    let side = raw
        .side
        .as_deref()
        .and_then(parse_side)
        .ok_or(GatewayError::DataAbsent { field: "order.side" })?;

    let action = raw
        .action
        .as_deref()
        .and_then(parse_action)
        .ok_or(GatewayError::DataAbsent { field: "order.action" })?;

    // The venue reports both legs; the order's own side picks which
    // cents field carries the limit price.
    let cents = match side {
        Side::Yes => raw.yes_price,
        Side::No => raw.no_price,
    }
    .ok_or(GatewayError::DataAbsent { field: "order.price" })?;

    Ok(OpenOrder {
        order_id: raw
            .order_id
            .clone()
            .ok_or(GatewayError::DataAbsent { field: "order.order_id" })?,
        side,
        action,
        price: cents_to_price(cents),
        remaining_size: raw
            .remaining_count
            .ok_or(GatewayError::DataAbsent { field: "order.remaining_count" })?,
    })
}

/// Kalshi trade API gateway for a single market.
pub struct KalshiGateway {
    /// Shared signed HTTP client.
    client: Arc<KalshiClient>,
    /// Market ticker this gateway is scoped to.
    market_ticker: String,
}

impl KalshiGateway {
    /// Create a gateway scoped to one market ticker.
    pub fn new(client: Arc<KalshiClient>, market_ticker: String) -> Self {
        Self {
            client,
            market_ticker,
        }
    }

    /// The market ticker this gateway trades.
    pub fn market_ticker(&self) -> &str {
        &self.market_ticker
    }

    /// Fetch the available account balance in cents.
    ///
    /// Not part of the quoting loop; logged once at startup as a
    /// sanity check that credentials work.
    pub async fn get_balance(&self) -> GatewayResult<i64> {
        let response: BalanceResponse = self
            .client
            .get_json("/trade-api/v2/portfolio/balance")
            .await?;
        response
            .balance
            .ok_or(GatewayError::DataAbsent { field: "balance" })
    }
}

#[async_trait]
impl ExchangeGateway for KalshiGateway {
    #[instrument(skip(self), fields(ticker = %self.market_ticker))]
    async fn get_price(&self) -> GatewayResult<MarketState> {
        let path = format!("/trade-api/v2/markets/{}/", self.market_ticker);
        let envelope: MarketEnvelope = self.client.get_json(&path).await?;
        let market = envelope
            .market
            .ok_or(GatewayError::DataAbsent { field: "market" })?;

        let yes_bid = market
            .yes_bid
            .ok_or(GatewayError::DataAbsent { field: "market.yes_bid" })?;
        let yes_ask = market
            .yes_ask
            .ok_or(GatewayError::DataAbsent { field: "market.yes_ask" })?;
        let no_bid = market
            .no_bid
            .ok_or(GatewayError::DataAbsent { field: "market.no_bid" })?;
        let no_ask = market
            .no_ask
            .ok_or(GatewayError::DataAbsent { field: "market.no_ask" })?;

        let state = MarketState {
            yes_mid: mid_of(yes_bid, yes_ask),
            no_mid: mid_of(no_bid, no_ask),
        };
        debug!(yes_mid = state.yes_mid, no_mid = state.no_mid, "Fetched mid prices");
        Ok(state)
    }

    #[instrument(skip(self), fields(ticker = %self.market_ticker))]
    async fn get_position(&self) -> GatewayResult<i64> {
        let response: PositionsResponse = self
            .client
            .get_json("/trade-api/v2/portfolio/positions")
            .await?;

        let net = response
            .market_positions
            .iter()
            .filter(|p| p.ticker == self.market_ticker)
            .map(|p| p.position)
            .sum();

        debug!(net, "Fetched net position");
        Ok(net)
    }

    #[instrument(skip(self), fields(ticker = %self.market_ticker))]
    async fn get_orders(&self) -> GatewayResult<Vec<OpenOrder>> {
        let response: OrdersResponse = self
            .client
            .get_json("/trade-api/v2/portfolio/orders")
            .await?;

        // Venue ordering is preserved: the reconciler's first-match-wins
        // rule depends on it.
        let orders = response
            .orders
            .iter()
            .filter(|o| o.ticker.as_deref() == Some(self.market_ticker.as_str()))
            .map(decode_order)
            .collect::<GatewayResult<Vec<_>>>()?;

        debug!(count = orders.len(), "Fetched open orders");
        Ok(orders)
    }

    #[instrument(skip(self, request), fields(ticker = %self.market_ticker, action = %request.action, price = request.price, count = request.count))]
    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderId> {
        let payload = build_order_payload(
            &self.market_ticker,
            request,
            Uuid::new_v4().to_string(),
        );

        info!(
            side = %request.side,
            cents = price_to_cents(request.price),
            "Placing limit order"
        );

        let envelope: OrderEnvelope = self
            .client
            .post_json("/trade-api/v2/portfolio/orders", &payload)
            .await?;

        envelope
            .order
            .and_then(|o| o.order_id)
            .ok_or(GatewayError::DataAbsent { field: "order.order_id" })
    }

    #[instrument(skip(self))]
    async fn cancel_order(&self, order_id: &str) -> GatewayResult<bool> {
        let path = format!("/trade-api/v2/portfolio/orders/{order_id}");
        let _: serde_json::Value = self.client.delete_json(&path).await?;
        info!(%order_id, "Order cancelled");
        Ok(true)
    }
}
