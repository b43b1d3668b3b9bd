//! Order entity and submission request.
//!
//! Agents build an [`OrderRequest`]; the engine validates it, assigns the
//! order id, and — for limit residuals — converts it into a resting
//! [`Order`]. Market orders never rest, so a resting order always carries a
//! concrete price.

use serde::{Deserialize, Serialize};

use crate::value_objects::{OrderId, Price, Side, TraderId, Volume};

/// Order kind. `Market` is mutually exclusive with a limit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Rests on the book if not (fully) marketable
    Limit,
    /// Matches immediately; any unfilled residual is discarded
    Market,
}

/// An order submission as built by an agent, before the engine has
/// validated it or assigned an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub trader_id: TraderId,
    pub side: Side,
    pub kind: OrderKind,
    /// Limit price in ticks; `None` for market orders
    pub price: Option<Price>,
    pub volume: Volume,
}

impl OrderRequest {
    /// A good-til-cancelled limit order
    pub fn limit(trader_id: TraderId, side: Side, price: Price, volume: Volume) -> Self {
        Self {
            trader_id,
            side,
            kind: OrderKind::Limit,
            price: Some(price),
            volume,
        }
    }

    /// A marketable order; executes against the opposite book and never rests
    pub fn market(trader_id: TraderId, side: Side, volume: Volume) -> Self {
        Self {
            trader_id,
            side,
            kind: OrderKind::Market,
            price: None,
            volume,
        }
    }
}

/// A resting order owned by the engine.
///
/// Immutable after insertion except for `volume`, which decreases
/// monotonically on partial fills; the order is released at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trader_id: TraderId,
    pub side: Side,
    pub price: Price,
    /// Residual volume
    pub volume: Volume,
    /// Engine's global counter at insertion; breaks time ties within a level
    pub arrival_sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_request_carries_price() {
        let req = OrderRequest::limit(
            TraderId::new(1),
            Side::Buy,
            Price::from_ticks(100),
            Volume::new(5),
        );
        assert_eq!(req.kind, OrderKind::Limit);
        assert_eq!(req.price, Some(Price::from_ticks(100)));
    }

    #[test]
    fn test_market_request_has_no_price() {
        let req = OrderRequest::market(TraderId::new(1), Side::Sell, Volume::new(5));
        assert_eq!(req.kind, OrderKind::Market);
        assert_eq!(req.price, None);
    }
}
