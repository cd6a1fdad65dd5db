//! Domain layer - Core business logic and models.
//!
//! This module contains the pure quoting logic for the Kalshi bot.
//! No external dependencies allowed here (hexagonal architecture inner ring).
//! All types are testable in isolation without a venue.

pub mod market;
pub mod quote;

// Re-export core types for convenience
pub use market::{MarketState, OpenOrder, OrderAction, OrderRequest, Quote, Side};
pub use quote::{ModelParameters, QuoteModel};
