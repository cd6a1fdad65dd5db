//! Core market-making domain types.
//!
//! Defines the business entities shared by the quote engine, the
//! reconciler, and the ports boundary: contract sides, order actions,
//! per-tick market state, desired quotes, and open-order snapshots.
//! Everything here is plain data — no I/O, no venue specifics.

use serde::{Deserialize, Serialize};

/// The two complementary outcomes of a binary prediction market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
        }
    }
}

/// Whether an order adds to or reduces a position on its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Per-tick snapshot of the market's mid prices.
///
/// Both sides are probabilities in [0, 1]. Refetched every tick and
/// discarded — never cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Mid price of the YES contract.
    pub yes_mid: f64,
    /// Mid price of the NO contract.
    pub no_mid: f64,
}

impl MarketState {
    /// Mid price for the given contract side.
    pub fn mid(&self, side: Side) -> f64 {
        match side {
            Side::Yes => self.yes_mid,
            Side::No => self.no_mid,
        }
    }
}

/// A two-sided desired quote computed fresh each tick.
///
/// Prices are probabilities in [0, 1]; sizes are contract counts >= 1.
/// Consumed immediately by the reconciler, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Desired bid price (<= mid).
    pub bid_price: f64,
    /// Desired ask price (>= mid).
    pub ask_price: f64,
    /// Contracts to quote on the buy side.
    pub buy_size: u32,
    /// Contracts to quote on the sell side.
    pub sell_size: u32,
}

/// A resting order observed on the venue's book.
///
/// `price` is already converted from the venue's integer cents to a
/// probability at the gateway boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOrder {
    /// Venue-assigned order ID.
    pub order_id: String,
    /// Contract side the order rests on.
    pub side: Side,
    /// Buy or sell.
    pub action: OrderAction,
    /// Limit price in [0, 1].
    pub price: f64,
    /// Unfilled contract count.
    pub remaining_size: u32,
}

/// A new limit order to submit to the venue.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Buy or sell.
    pub action: OrderAction,
    /// Contract side to quote.
    pub side: Side,
    /// Limit price in (0, 1); transmitted as integer cents.
    pub price: f64,
    /// Contract count (>= 1).
    pub count: u32,
    /// Optional expiration as epoch seconds.
    pub expiration_ts: Option<i64>,
}
