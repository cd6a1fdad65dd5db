//! Kalshi Trade API Adapter
//!
//! Implements the `ExchangeGateway` port against the Kalshi trade API
//! v2. Handles RSA-PSS authentication, order placement, cancellation,
//! and market/portfolio queries for a single configured ticker.
//!
//! Sub-modules:
//! - `auth`: RSA-PSS (SHA-256 + MGF1) request signing
//! - `client`: signed HTTP client, one attempt per request
//! - `gateway`: `ExchangeGateway` implementation, cents conversion
//! - `types`: API request/response type definitions

pub mod auth;
pub mod client;
pub mod gateway;
pub mod types;

pub use auth::KalshiAuth;
pub use client::{KalshiClient, KalshiClientConfig};
pub use gateway::KalshiGateway;
