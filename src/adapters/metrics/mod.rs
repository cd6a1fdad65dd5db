//! Metrics and Monitoring Adapters
//!
//! Prometheus metrics registry (implements the `StrategyObserver`
//! port) and the axum health/metrics server.

pub mod health;
pub mod prometheus;

pub use health::HealthServer;
pub use prometheus::BotMetrics;
