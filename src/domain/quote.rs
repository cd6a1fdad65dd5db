//! Avellaneda-Stoikov quote engine.
//!
//! Implements the stochastic inventory-control model from
//! Avellaneda & Stoikov (2008) "High-frequency trading in a limit
//! order book", adapted to binary prediction-market contracts whose
//! prices live in [0, 1].
//!
//! All functions are pure: market state and elapsed time in, quote out.
//! No I/O is allowed in this module.

use serde::Deserialize;

use super::market::{Quote, Side};

/// Model parameters, fixed for the lifetime of a run.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelParameters {
    /// Base risk-aversion coefficient (gamma).
    pub gamma: f64,
    /// Order-book liquidity/depth parameter (k).
    pub k: f64,
    /// Mid-price volatility (sigma).
    pub sigma: f64,
    /// Trading horizon T in seconds; risk terms decay to zero at T.
    pub horizon_secs: f64,
    /// Symmetric inventory cap, soft-enforced through skewing only.
    pub max_position: i64,
    /// Hard floor on the quoted spread.
    pub min_spread: f64,
    /// Fraction of `max_position` used to cap the risk-adding side.
    pub position_limit_buffer: f64,
    /// Linear fair-value shift per contract of inventory.
    pub inventory_skew_factor: f64,
    /// Contract side this strategy quotes.
    pub trade_side: Side,
    /// Venue-side TTL attached to every placed order, in seconds.
    pub order_expiration_secs: i64,
}

/// Damping applied to the raw model spread before the floor.
const SPREAD_DAMPING: f64 = 0.01;

/// Multiplier on the inventory-driven spread skew.
const SKEW_MULTIPLIER: f64 = 3.0;

/// Pure quoting engine over a fixed [`ModelParameters`] set.
///
/// Maps (mid price, net inventory, elapsed time) to a reservation
/// price, an optimal spread, an asymmetric bid/ask pair, and order
/// sizes. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct QuoteModel {
    params: ModelParameters,
}

impl QuoteModel {
    /// Create an engine over the given parameter set.
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    /// Access the underlying parameters.
    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Net inventory as a signed fraction of the position cap.
    fn position_ratio(&self, inventory: i64) -> f64 {
        inventory as f64 / self.params.max_position as f64
    }

    /// Risk-aversion coefficient scaled by inventory utilization.
    ///
    /// Note the direction: gamma *shrinks* as utilization grows
    /// (`exp(-|ratio|)`), which is the inverse of the usual
    /// inventory-control intent. Reproduced as observed in the
    /// production strategy; see DESIGN.md before changing.
    pub fn dynamic_gamma(&self, inventory: i64) -> f64 {
        self.params.gamma * (-self.position_ratio(inventory).abs()).exp()
    }

    /// Inventory-risk-adjusted fair value used as the quoting center.
    ///
    /// The risk term decays linearly to zero as `t` approaches the
    /// horizon. At zero inventory the reservation price equals the mid.
    pub fn reservation_price(&self, mid: f64, inventory: i64, t: f64) -> f64 {
        let dg = self.dynamic_gamma(inventory);
        let inv = inventory as f64;
        let inventory_skew = inv * self.params.inventory_skew_factor * mid;
        let time_remaining = 1.0 - t / self.params.horizon_secs;
        mid + inventory_skew - inv * dg * self.params.sigma.powi(2) * time_remaining
    }

    /// Optimal full spread from the inventory-control model.
    ///
    /// Classic closed form `gamma*sigma^2*(T-t) + (2/gamma)*ln(1+gamma/k)`,
    /// scaled down quadratically as inventory utilization grows and by a
    /// fixed damping factor, then floored at `min_spread`.
    /// Contract: the result is always >= `min_spread`.
    pub fn optimal_spread(&self, t: f64, inventory: i64) -> f64 {
        let dg = self.dynamic_gamma(inventory);
        let time_remaining = 1.0 - t / self.params.horizon_secs;
        let base = dg * self.params.sigma.powi(2) * time_remaining
            + (2.0 / dg) * (1.0 + dg / self.params.k).ln();
        let utilization = self.position_ratio(inventory).abs();
        let adjustment = 1.0 - utilization.powi(2);
        (base * adjustment * SPREAD_DAMPING).max(self.params.min_spread)
    }

    /// Bid/ask pair skewed to bias fills toward reducing inventory.
    ///
    /// The half-spread on the side that would *increase* inventory is
    /// widened (less aggressive); the flattening side is tightened but
    /// floored at `min_spread / 2`. Both quotes are clamped so that
    /// `bid <= mid <= ask` and both stay inside [0, 1].
    pub fn asymmetric_quotes(&self, mid: f64, inventory: i64, t: f64) -> (f64, f64) {
        let reservation = self.reservation_price(mid, inventory, t);
        let base_spread = self.optimal_spread(t, inventory);

        let adjustment = base_spread * self.position_ratio(inventory).abs() * SKEW_MULTIPLIER;
        let half = base_spread / 2.0;
        let floor = self.params.min_spread / 2.0;

        let (bid_half, ask_half) = if inventory > 0 {
            // Long: back off the bid, lean on the ask.
            (half + adjustment, (half - adjustment).max(floor))
        } else {
            ((half - adjustment).max(floor), half + adjustment)
        };

        let bid = (reservation - bid_half).clamp(0.0, mid);
        let ask = (reservation + ask_half).clamp(mid, 1.0);
        (bid, ask)
    }

    /// Order sizes for each action side given current inventory.
    ///
    /// The side that would add to inventory is capped by the position
    /// buffer and the remaining capacity; the flattening side quotes
    /// the full `max_position`. Contract: both sizes are >= 1.
    pub fn order_sizes(&self, inventory: i64) -> (u32, u32) {
        let max_position = self.params.max_position;
        let remaining = max_position - inventory.abs();
        let buffer = (max_position as f64 * self.params.position_limit_buffer) as i64;

        let (buy, sell) = if inventory > 0 {
            (buffer.min(remaining).max(1), max_position.max(1))
        } else {
            (max_position.max(1), buffer.min(remaining).max(1))
        };

        (buy as u32, sell as u32)
    }

    /// Full desired quote for one tick: prices plus sizes.
    pub fn quote(&self, mid: f64, inventory: i64, t: f64) -> Quote {
        let (bid_price, ask_price) = self.asymmetric_quotes(mid, inventory, t);
        let (buy_size, sell_size) = self.order_sizes(inventory);
        Quote {
            bid_price,
            ask_price,
            buy_size,
            sell_size,
        }
    }
}
