//! The matching engine: order intake, crossing, and receipt generation.

use std::collections::HashMap;

use log::debug;
use market_core::{Order, OrderId, OrderKind, OrderRequest, Price, Side, TradeReceipt, TraderId, Volume};

use crate::book::{NodeHandle, PriceBook};
use crate::error::{EngineError, Result};
use crate::notifications::NotificationBus;

/// Outcome of an accepted submission: the assigned id plus the receipts
/// generated while the order crossed the book (also delivered to the
/// counterparties' inboxes).
#[derive(Debug, Clone)]
pub struct Execution {
    pub order_id: OrderId,
    pub receipts: Vec<TradeReceipt>,
}

/// A Level-3 order book with price-time priority matching.
///
/// Owns the bid and ask ladders, the order index, the notification bus,
/// and the monotonic id/sequence counters. Invariant at rest:
/// `best_bid < best_ask` or one side is empty — the book is never locked
/// or crossed after `process_order` returns.
#[derive(Debug)]
pub struct MatchingEngine {
    bids: PriceBook,
    asks: PriceBook,
    /// order id -> (side, resting price, intrusive queue handle)
    index: HashMap<OrderId, (Side, Price, NodeHandle)>,
    bus: NotificationBus,
    next_order_id: u64,
    /// Global arrival/fill counter; totally orders engine events
    sequence: u64,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            bids: PriceBook::new(Side::Buy),
            asks: PriceBook::new(Side::Sell),
            index: HashMap::new(),
            bus: NotificationBus::new(),
            next_order_id: 1,
            sequence: 0,
        }
    }

    /// Highest resting buy price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest resting sell price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// `(best_bid + best_ask) / 2`; undefined while either side is empty
    pub fn mid(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.to_f64() + ask.to_f64()) / 2.0),
            _ => None,
        }
    }

    /// Validate and execute a submission.
    ///
    /// The incoming order is matched against the opposite ladder while it
    /// crosses, one receipt per maker filled, at the maker's resting price.
    /// A limit residual then rests on its own side; a market residual is
    /// discarded. Rejections leave the engine untouched.
    pub fn process_order(&mut self, request: OrderRequest) -> Result<Execution> {
        if request.volume.is_zero() {
            return Err(EngineError::InvalidVolume);
        }
        let limit = match (request.kind, request.price) {
            (OrderKind::Limit, Some(price)) => Some(price),
            (OrderKind::Market, None) => None,
            (OrderKind::Limit, None) => return Err(EngineError::LimitOrderWithoutPrice),
            (OrderKind::Market, Some(_)) => return Err(EngineError::MarketOrderWithPrice),
        };

        let order_id = OrderId::new(self.next_order_id);
        self.next_order_id += 1;
        debug!(
            "order {}: trader {} {} {:?} vol={} price={:?}",
            order_id, request.trader_id, request.side, request.kind, request.volume, request.price,
        );

        let mut residual = request.volume;
        let mut receipts = Vec::new();

        loop {
            if residual.is_zero() {
                break;
            }
            let opposite = match request.side {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            let Some(best) = opposite.best_price() else {
                break;
            };
            if let Some(limit) = limit {
                let crosses = match request.side {
                    Side::Buy => limit >= best,
                    Side::Sell => limit <= best,
                };
                if !crosses {
                    break;
                }
            }

            let fills = opposite.fill_at(best, &mut residual);
            if fills.is_empty() {
                break;
            }
            for fill in fills {
                if fill.exhausted {
                    self.index.remove(&fill.maker_order);
                }
                self.sequence += 1;
                let receipt = TradeReceipt {
                    taker_id: request.trader_id,
                    maker_id: fill.maker_trader,
                    price: best,
                    volume: fill.volume,
                    taker_is_bid: request.side.is_buy(),
                    engine_sequence: self.sequence,
                };
                self.bus.publish(&receipt);
                receipts.push(receipt);
            }
        }

        if !residual.is_zero() {
            match limit {
                Some(price) => {
                    self.sequence += 1;
                    let order = Order {
                        id: order_id,
                        trader_id: request.trader_id,
                        side: request.side,
                        price,
                        volume: residual,
                        arrival_sequence: self.sequence,
                    };
                    let book = match request.side {
                        Side::Buy => &mut self.bids,
                        Side::Sell => &mut self.asks,
                    };
                    let handle = book.insert(order);
                    self.index.insert(order_id, (request.side, price, handle));
                }
                None => {
                    // Policy: unfilled market residual is discarded
                    debug!("order {}: market residual {} discarded", order_id, residual);
                }
            }
        }

        Ok(Execution { order_id, receipts })
    }

    /// Cancel a resting order. Returns false when the id is unknown or
    /// already filled; that is a no-op, not an error.
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        let Some((side, price, handle)) = self.index.remove(&order_id) else {
            debug!("cancel {}: unknown or already filled", order_id);
            return false;
        };
        let book = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let removed = book.remove(price, handle);
        debug_assert!(removed.is_some_and(|order| order.id == order_id));
        debug!("cancel {}: removed from {} {}", order_id, side, price);
        true
    }

    /// Drain the trader's inbox, oldest receipt first
    pub fn poll_receipts(&mut self, trader: TraderId) -> Vec<TradeReceipt> {
        self.bus.drain(trader)
    }

    /// Receipts queued but not yet polled for `trader`
    pub fn pending_receipts(&self, trader: TraderId) -> usize {
        self.bus.pending(trader)
    }

    /// All resting orders of one trader as `(id, price, residual)`.
    /// Linear in the book size; diagnostics only.
    pub fn open_orders(&self, trader: TraderId) -> Vec<(OrderId, Price, Volume)> {
        let mut orders: Vec<_> = self
            .bids
            .orders()
            .chain(self.asks.orders())
            .filter(|order| order.trader_id == trader)
            .map(|order| (order.id, order.price, order.volume))
            .collect();
        orders.sort_by_key(|(id, _, _)| *id);
        orders
    }

    /// Count of resting orders across both sides
    pub fn resting_order_count(&self) -> usize {
        self.index.len()
    }

    /// Total resting volume on the bid side
    pub fn bid_depth(&self) -> u64 {
        self.bids.depth()
    }

    /// Total resting volume on the ask side
    pub fn ask_depth(&self) -> u64 {
        self.asks.depth()
    }

    /// Resting volume at one price on one side
    pub fn volume_at(&self, side: Side, price: Price) -> u64 {
        match side {
            Side::Buy => self.bids.volume_at(price),
            Side::Sell => self.asks.volume_at(price),
        }
    }

    /// Best `n` bid levels as `(price, volume)`, best first
    pub fn bid_levels(&self, n: usize) -> Vec<(Price, u64)> {
        self.bids.top_levels(n)
    }

    /// Best `n` ask levels as `(price, volume)`, best first
    pub fn ask_levels(&self, n: usize) -> Vec<(Price, u64)> {
        self.asks.top_levels(n)
    }

    /// Next order to execute on `side` under price-time priority
    pub fn peek_best_order(&self, side: Side) -> Option<&Order> {
        match side {
            Side::Buy => self.bids.peek_best_order(),
            Side::Sell => self.asks.peek_best_order(),
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trader(id: u64) -> TraderId {
        TraderId::new(id)
    }

    fn limit(t: u64, side: Side, price: i64, volume: u64) -> OrderRequest {
        OrderRequest::limit(trader(t), side, Price::from_ticks(price), Volume::new(volume))
    }

    #[test]
    fn test_empty_book_has_no_prices() {
        let engine = MatchingEngine::new();
        assert_eq!(engine.best_bid(), None);
        assert_eq!(engine.best_ask(), None);
        assert_eq!(engine.mid(), None);
    }

    #[test]
    fn test_rejects_zero_volume() {
        let mut engine = MatchingEngine::new();
        let err = engine
            .process_order(limit(1, Side::Buy, 100, 0))
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidVolume);
        assert_eq!(engine.resting_order_count(), 0);
    }

    #[test]
    fn test_rejects_limit_without_price() {
        let mut engine = MatchingEngine::new();
        let request = OrderRequest {
            trader_id: trader(1),
            side: Side::Buy,
            kind: OrderKind::Limit,
            price: None,
            volume: Volume::new(1),
        };
        assert_eq!(
            engine.process_order(request).unwrap_err(),
            EngineError::LimitOrderWithoutPrice
        );
    }

    #[test]
    fn test_rejects_market_with_price() {
        let mut engine = MatchingEngine::new();
        let request = OrderRequest {
            trader_id: trader(1),
            side: Side::Sell,
            kind: OrderKind::Market,
            price: Some(Price::from_ticks(100)),
            volume: Volume::new(1),
        };
        assert_eq!(
            engine.process_order(request).unwrap_err(),
            EngineError::MarketOrderWithPrice
        );
    }

    #[test]
    fn test_rejection_does_not_consume_order_id() {
        let mut engine = MatchingEngine::new();
        let _ = engine.process_order(limit(1, Side::Buy, 100, 0));
        let exec = engine.process_order(limit(1, Side::Buy, 100, 1)).unwrap();
        assert_eq!(exec.order_id, OrderId::new(1));
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut engine = MatchingEngine::new();
        let a = engine.process_order(limit(1, Side::Buy, 99, 1)).unwrap();
        let b = engine.process_order(limit(1, Side::Sell, 101, 1)).unwrap();
        assert_eq!(a.order_id, OrderId::new(1));
        assert_eq!(b.order_id, OrderId::new(2));
    }

    #[test]
    fn test_mid_requires_both_sides() {
        let mut engine = MatchingEngine::new();
        engine.process_order(limit(1, Side::Buy, 99, 1)).unwrap();
        assert_eq!(engine.mid(), None);
        engine.process_order(limit(1, Side::Sell, 101, 1)).unwrap();
        assert_eq!(engine.mid(), Some(100.0));
    }

    #[test]
    fn test_cancel_unknown_id_is_false() {
        let mut engine = MatchingEngine::new();
        assert!(!engine.cancel_order(OrderId::new(7)));
    }

    #[test]
    fn test_market_order_on_empty_book_fills_nothing() {
        let mut engine = MatchingEngine::new();
        let exec = engine
            .process_order(OrderRequest::market(trader(1), Side::Buy, Volume::new(5)))
            .unwrap();
        assert!(exec.receipts.is_empty());
        assert_eq!(engine.resting_order_count(), 0);
    }

    #[test]
    fn test_index_size_matches_resting_orders() {
        let mut engine = MatchingEngine::new();
        engine.process_order(limit(1, Side::Buy, 99, 5)).unwrap();
        engine.process_order(limit(1, Side::Buy, 98, 5)).unwrap();
        engine.process_order(limit(2, Side::Sell, 101, 5)).unwrap();

        // fully fills the resting ask, leaving only the two bids
        let exec = engine.process_order(limit(3, Side::Buy, 101, 5)).unwrap();
        assert_eq!(exec.receipts.len(), 1);

        assert_eq!(
            engine.index.len(),
            engine.bids.order_count() + engine.asks.order_count()
        );
        assert_eq!(engine.resting_order_count(), 2);
    }

    #[test]
    fn test_open_orders_filters_by_trader() {
        let mut engine = MatchingEngine::new();
        engine.process_order(limit(1, Side::Buy, 99, 2)).unwrap();
        engine.process_order(limit(2, Side::Sell, 101, 3)).unwrap();

        let mine = engine.open_orders(trader(1));
        assert_eq!(mine, vec![(OrderId::new(1), Price::from_ticks(99), Volume::new(2))]);
    }
}
