//! Level-3 limit order book matching engine.
//!
//! The book stores each individual resting order. Two price ladders (one
//! per side) hold FIFO queues at every price level, an order index gives
//! O(1) lookup by id for cancellation, and the matcher produces trade
//! receipts routed to both counterparties through a per-trader
//! notification bus.
//!
//! The engine is strictly single-threaded and synchronous: one
//! [`MatchingEngine`] instance is the unit of state, and nothing in this
//! crate shares mutable state across threads.

mod book;
mod engine;
mod error;
mod notifications;

pub use engine::{Execution, MatchingEngine};
pub use error::{EngineError, Result};
pub use notifications::NotificationBus;
