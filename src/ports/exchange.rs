//! Exchange Gateway Port - Venue Trading Interface
//!
//! Defines the trait the quoting core requires from an authenticated
//! venue client: price/position/order reads plus place/cancel writes.
//! Adapters implement this against the real Kalshi REST API; tests use
//! a deterministic mock.
//!
//! Failure policy (explicit, not exception-swallowing): every method
//! returns `Result<_, GatewayError>`. Callers absorb errors at the
//! tick boundary — log, skip the affected action, continue. No retry
//! or backoff exists anywhere in the strategy.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::market::{MarketState, OpenOrder, OrderRequest};

/// Venue-assigned order identifier.
pub type OrderId = String;

/// Gateway failure taxonomy.
///
/// `Auth` is fatal at startup (the process must not enter the loop);
/// everything else is absorbed per tick by the strategy.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credential or signing setup failed.
    #[error("authentication failure: {0}")]
    Auth(String),

    /// Transport-level error on a venue call.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// Venue returned a non-2xx response.
    #[error("venue rejected request ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, if readable.
        body: String,
    },

    /// A required field was missing from a decoded response.
    #[error("expected field absent from venue response: {field}")]
    DataAbsent {
        /// Dotted path of the missing field.
        field: &'static str,
    },
}

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Trait for authenticated venue clients.
///
/// Implementors are scoped to a single market ticker. All calls are
/// independent round trips; the strategy loop serializes them, so no
/// internal ordering guarantees are required beyond per-call atomicity.
#[async_trait]
pub trait ExchangeGateway: Send + Sync + 'static {
    /// Fetch current mid prices for both contract sides.
    async fn get_price(&self) -> GatewayResult<MarketState>;

    /// Fetch the signed net contract count held on this market.
    async fn get_position(&self) -> GatewayResult<i64>;

    /// Fetch all resting orders for this market, in venue order.
    ///
    /// Iteration order matters: the reconciler keeps the first match,
    /// so implementors must preserve the venue's ordering.
    async fn get_orders(&self) -> GatewayResult<Vec<OpenOrder>>;

    /// Place a limit order; returns the venue-assigned order ID.
    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderId>;

    /// Cancel a resting order. Returns whether the venue confirmed it.
    async fn cancel_order(&self, order_id: &str) -> GatewayResult<bool>;
}
