//! Per-trader delivery of trade receipts.

use std::collections::{HashMap, VecDeque};

use market_core::{TradeReceipt, TraderId};

/// Append-only per-trader inboxes.
///
/// The engine pushes every receipt to both counterparties' queues;
/// consumers drain their queue each tick. Delivery is in-order per trader
/// and preserves the engine's sequence ordering within a single
/// `process_order` call. A self-trade is delivered once: the single
/// receipt carries both legs.
#[derive(Debug, Default)]
pub struct NotificationBus {
    inboxes: HashMap<TraderId, VecDeque<TradeReceipt>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a receipt to the taker's and the maker's inbox
    pub fn publish(&mut self, receipt: &TradeReceipt) {
        self.inboxes
            .entry(receipt.taker_id)
            .or_default()
            .push_back(*receipt);
        if receipt.maker_id != receipt.taker_id {
            self.inboxes
                .entry(receipt.maker_id)
                .or_default()
                .push_back(*receipt);
        }
    }

    /// Remove and return everything queued for `trader`, oldest first
    pub fn drain(&mut self, trader: TraderId) -> Vec<TradeReceipt> {
        self.inboxes
            .get_mut(&trader)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    /// Receipts currently queued for `trader`
    pub fn pending(&self, trader: TraderId) -> usize {
        self.inboxes.get(&trader).map_or(0, VecDeque::len)
    }
}
