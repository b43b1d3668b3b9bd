//! One side of the book: a price ladder over FIFO levels.

use std::collections::BTreeMap;

use market_core::{Order, Price, Side, Volume};
use slab::Slab;

use super::price_level::{LevelFill, NodeHandle, OrderNode, PriceLevel};

/// All resting orders on one side, keyed by price.
///
/// The balanced tree is both the price→level mapping and the ordered
/// structure over present prices: best bid is the maximum key, best ask
/// the minimum, each an O(log U) query. Every key holds a non-empty level;
/// a level is deleted from the tree by the removal that empties it.
#[derive(Debug)]
pub(crate) struct PriceBook {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
    arena: Slab<OrderNode>,
}

impl PriceBook {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            arena: Slab::new(),
        }
    }

    /// Best price on this side: maximum for bids, minimum for asks
    pub(crate) fn best_price(&self) -> Option<Price> {
        let entry = match self.side {
            Side::Buy => self.levels.last_key_value(),
            Side::Sell => self.levels.first_key_value(),
        };
        entry.map(|(price, _)| *price)
    }

    /// Rest an order, creating its price level if needed. O(log U).
    pub(crate) fn insert(&mut self, order: Order) -> NodeHandle {
        let level = self
            .levels
            .entry(order.price)
            .or_insert_with(|| PriceLevel::new(order.price));
        level.push_back(&mut self.arena, order)
    }

    /// Remove a resting order by its intrusive handle. The unlink itself is
    /// O(1); deleting an emptied level costs O(log U).
    pub(crate) fn remove(&mut self, price: Price, handle: NodeHandle) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let order = level.unlink(&mut self.arena, handle);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(order)
    }

    /// Match an incoming residual against the level at `price`, removing
    /// the level if it empties.
    pub(crate) fn fill_at(&mut self, price: Price, incoming: &mut Volume) -> Vec<LevelFill> {
        let Some(level) = self.levels.get_mut(&price) else {
            return Vec::new();
        };
        let fills = level.fill(&mut self.arena, incoming);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        fills
    }

    /// Resting order behind a handle
    pub(crate) fn order(&self, handle: NodeHandle) -> Option<&Order> {
        self.arena.get(handle).map(|node| &node.order)
    }

    /// Head order at the best price
    pub(crate) fn peek_best_order(&self) -> Option<&Order> {
        let price = self.best_price()?;
        let level = self.levels.get(&price)?;
        self.order(level.front()?)
    }

    /// Number of resting orders on this side
    pub(crate) fn order_count(&self) -> usize {
        self.arena.len()
    }

    /// Total resting volume on this side
    pub(crate) fn depth(&self) -> u64 {
        self.levels.values().map(PriceLevel::volume).sum()
    }

    /// Resting volume at one price (0 if the level is absent)
    pub(crate) fn volume_at(&self, price: Price) -> u64 {
        self.levels.get(&price).map_or(0, PriceLevel::volume)
    }

    /// Best `n` levels as `(price, volume)`, best first
    pub(crate) fn top_levels(&self, n: usize) -> Vec<(Price, u64)> {
        let snapshot = |level: &PriceLevel| (level.price(), level.volume());
        match self.side {
            Side::Buy => self.levels.values().rev().take(n).map(snapshot).collect(),
            Side::Sell => self.levels.values().take(n).map(snapshot).collect(),
        }
    }

    /// Iterate all resting orders (diagnostics)
    pub(crate) fn orders(&self) -> impl Iterator<Item = &Order> {
        self.arena.iter().map(|(_, node)| &node.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::{OrderId, TraderId};

    fn order(id: u64, side: Side, price: i64, volume: u64) -> Order {
        Order {
            id: OrderId::new(id),
            trader_id: TraderId::new(9),
            side,
            price: Price::from_ticks(price),
            volume: Volume::new(volume),
            arrival_sequence: id,
        }
    }

    #[test]
    fn test_best_bid_is_maximum() {
        let mut book = PriceBook::new(Side::Buy);
        book.insert(order(1, Side::Buy, 98, 1));
        book.insert(order(2, Side::Buy, 100, 1));
        book.insert(order(3, Side::Buy, 99, 1));

        assert_eq!(book.best_price(), Some(Price::from_ticks(100)));
    }

    #[test]
    fn test_best_ask_is_minimum() {
        let mut book = PriceBook::new(Side::Sell);
        book.insert(order(1, Side::Sell, 102, 1));
        book.insert(order(2, Side::Sell, 100, 1));
        book.insert(order(3, Side::Sell, 101, 1));

        assert_eq!(book.best_price(), Some(Price::from_ticks(100)));
    }

    #[test]
    fn test_remove_deletes_empty_level() {
        let mut book = PriceBook::new(Side::Buy);
        let handle = book.insert(order(1, Side::Buy, 100, 2));
        book.insert(order(2, Side::Buy, 99, 2));

        let removed = book.remove(Price::from_ticks(100), handle);

        assert_eq!(removed.map(|o| o.id), Some(OrderId::new(1)));
        assert_eq!(book.best_price(), Some(Price::from_ticks(99)));
        assert_eq!(book.volume_at(Price::from_ticks(100)), 0);
    }

    #[test]
    fn test_fill_at_removes_empty_level() {
        let mut book = PriceBook::new(Side::Sell);
        book.insert(order(1, Side::Sell, 100, 2));

        let mut incoming = Volume::new(5);
        let fills = book.fill_at(Price::from_ticks(100), &mut incoming);

        assert_eq!(fills.len(), 1);
        assert_eq!(incoming, Volume::new(3));
        assert_eq!(book.best_price(), None);
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn test_depth_and_top_levels() {
        let mut book = PriceBook::new(Side::Sell);
        book.insert(order(1, Side::Sell, 101, 3));
        book.insert(order(2, Side::Sell, 100, 2));
        book.insert(order(3, Side::Sell, 100, 1));

        assert_eq!(book.depth(), 6);
        assert_eq!(
            book.top_levels(2),
            vec![(Price::from_ticks(100), 3), (Price::from_ticks(101), 3)]
        );
    }

    #[test]
    fn test_peek_best_order_is_level_head() {
        let mut book = PriceBook::new(Side::Sell);
        book.insert(order(1, Side::Sell, 100, 2));
        book.insert(order(2, Side::Sell, 100, 4));

        assert_eq!(book.peek_best_order().map(|o| o.id), Some(OrderId::new(1)));
    }
}
