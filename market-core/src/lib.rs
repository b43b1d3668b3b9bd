//! Shared value objects and entities for the LOB simulation.
//!
//! Everything that crosses the boundary between the matching engine and the
//! agents lives here: integer-tick prices, volumes, order identities, the
//! order entity itself, and the trade receipt delivered to participants.

pub mod entities;
pub mod value_objects;

// Re-export value objects at crate root for convenience
pub use value_objects::{OrderId, Price, Side, TraderId, Volume};

// Re-export entities at crate root
pub use entities::{Order, OrderKind, OrderRequest, TradeReceipt};
