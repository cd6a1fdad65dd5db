//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, metrics server). Each
//! sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `kalshi`: Kalshi trade API client, auth, and gateway
//! - `metrics`: Prometheus metrics export and health checks

pub mod kalshi;
pub mod metrics;
