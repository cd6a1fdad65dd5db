//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's core workflows.
//!
//! Use cases:
//! - `OrderReconciler`: keep/cancel/place decisions per action side
//! - `StrategyLoop`: fetch-compute-reconcile-sleep over the horizon

pub mod reconciler;
pub mod strategy;

pub use reconciler::{OrderReconciler, ReconcileSummary};
pub use strategy::StrategyLoop;
