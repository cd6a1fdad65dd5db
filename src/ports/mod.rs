//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ExchangeGateway`: authenticated venue reads and order writes
//! - `StrategyObserver`: metrics/observability seam for the loop

pub mod exchange;
pub mod telemetry;

pub use exchange::{ExchangeGateway, GatewayError, GatewayResult, OrderId};
pub use telemetry::{NoopObserver, StrategyObserver};
