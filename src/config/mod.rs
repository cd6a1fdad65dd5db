//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! credentials supplied separately via `.env`. Every model parameter
//! is externalized here - nothing is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::market::Side;
use crate::domain::quote::ModelParameters;

/// Top-level bot configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the bot begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bot identity and metadata.
    pub bot: BotConfig,
    /// The single market this run quotes.
    pub market: MarketConfig,
    /// Avellaneda-Stoikov model parameters.
    pub model: ModelConfig,
    /// Kalshi API endpoint configuration.
    pub api: ApiConfig,
    /// Metrics and monitoring.
    pub metrics: MetricsConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Human-readable bot name.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Enable dry-run mode (quotes computed, no orders touched).
    #[serde(default)]
    pub dry_run: bool,
}

/// Market configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Kalshi market ticker, e.g. "KXHIGHNY-25AUG29-B85.5".
    pub ticker: String,
    /// Contract side to quote (yes or no).
    pub trade_side: Side,
}

/// Avellaneda-Stoikov model configuration.
///
/// Field meanings and defaults track the production strategy; see
/// `domain::quote::ModelParameters` for the math each one feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Base risk-aversion coefficient (gamma).
    pub gamma: f64,
    /// Order-book liquidity parameter (k).
    pub k: f64,
    /// Mid-price volatility (sigma).
    pub sigma: f64,
    /// Trading horizon T in seconds.
    pub horizon_secs: f64,
    /// Symmetric inventory cap in contracts.
    pub max_position: i64,
    /// Hard floor on the quoted spread.
    #[serde(default = "default_min_spread")]
    pub min_spread: f64,
    /// Fraction of max_position capping the risk-adding side.
    #[serde(default = "default_position_limit_buffer")]
    pub position_limit_buffer: f64,
    /// Linear fair-value shift per contract of inventory.
    #[serde(default = "default_inventory_skew_factor")]
    pub inventory_skew_factor: f64,
    /// Venue-side TTL for placed orders, in seconds.
    pub order_expiration_secs: i64,
    /// Tick cadence dt, in seconds.
    pub tick_interval_secs: f64,
}

impl ModelConfig {
    /// Convert into the immutable domain parameter set.
    pub fn to_model_parameters(&self, trade_side: Side) -> ModelParameters {
        ModelParameters {
            gamma: self.gamma,
            k: self.k,
            sigma: self.sigma,
            horizon_secs: self.horizon_secs,
            max_position: self.max_position,
            min_spread: self.min_spread,
            position_limit_buffer: self.position_limit_buffer,
            inventory_skew_factor: self.inventory_skew_factor,
            trade_side,
            order_expiration_secs: self.order_expiration_secs,
        }
    }
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Kalshi trade API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable the health/metrics server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Health/metrics server bind address.
    #[serde(default = "default_metrics_addr")]
    pub bind_address: String,
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_spread() -> f64 {
    0.01
}

fn default_position_limit_buffer() -> f64 {
    0.1
}

fn default_inventory_skew_factor() -> f64 {
    0.01
}

fn default_base_url() -> String {
    "https://api.elections.kalshi.com".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}
