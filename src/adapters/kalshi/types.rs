//! Kalshi API Request/Response Types
//!
//! Serialization types for the Kalshi trade API v2. Prices travel as
//! integer cents on the wire. Fields the core requires are `Option`
//! here and promoted to hard values (or `DataAbsent`) at the gateway
//! boundary — a malformed response must never panic the loop.

use serde::{Deserialize, Serialize};

/// Envelope for GET /trade-api/v2/markets/{ticker}/.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEnvelope {
    /// The market body.
    pub market: Option<MarketQuotes>,
}

/// Best bid/ask per side, in integer cents.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketQuotes {
    /// Best YES bid in cents.
    pub yes_bid: Option<f64>,
    /// Best YES ask in cents.
    pub yes_ask: Option<f64>,
    /// Best NO bid in cents.
    pub no_bid: Option<f64>,
    /// Best NO ask in cents.
    pub no_ask: Option<f64>,
}

/// Envelope for GET /trade-api/v2/portfolio/positions.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    /// Per-market position entries.
    #[serde(default)]
    pub market_positions: Vec<MarketPosition>,
}

/// One market position entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketPosition {
    /// Market ticker.
    pub ticker: String,
    /// Signed net contract count.
    pub position: i64,
}

/// Envelope for GET /trade-api/v2/portfolio/orders.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersResponse {
    /// Resting orders, in venue order.
    #[serde(default)]
    pub orders: Vec<ApiOrder>,
}

/// One resting order as the venue reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOrder {
    /// Venue-assigned order ID.
    pub order_id: Option<String>,
    /// Market ticker the order belongs to.
    pub ticker: Option<String>,
    /// "yes" or "no".
    pub side: Option<String>,
    /// "buy" or "sell".
    pub action: Option<String>,
    /// Limit price of the YES leg in cents.
    pub yes_price: Option<f64>,
    /// Limit price of the NO leg in cents.
    pub no_price: Option<f64>,
    /// Unfilled contract count.
    pub remaining_count: Option<u32>,
}

/// Payload for POST /trade-api/v2/portfolio/orders.
///
/// Exactly one of `yes_price`/`no_price` is set, as integer cents
/// (a price of 0.45 is transmitted as 45).
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    /// Market ticker.
    pub ticker: String,
    /// "buy" or "sell".
    pub action: String,
    /// "yes" or "no".
    pub side: String,
    /// Contract count.
    pub count: u32,
    /// Always "limit".
    #[serde(rename = "type")]
    pub order_type: String,
    /// YES limit price in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<i64>,
    /// NO limit price in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<i64>,
    /// Expiration as epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_ts: Option<i64>,
    /// Client-generated idempotency ID.
    pub client_order_id: String,
}

/// Envelope for the order-creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEnvelope {
    /// The created order.
    pub order: Option<CreatedOrder>,
}

/// The created order body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    /// Venue-assigned order ID.
    pub order_id: Option<String>,
}

/// Envelope for GET /trade-api/v2/portfolio/balance.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Available balance in cents.
    pub balance: Option<i64>,
}
