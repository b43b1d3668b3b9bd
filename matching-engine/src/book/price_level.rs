//! A FIFO queue of resting orders at one price.
//!
//! The queue is an intrusive doubly-linked list whose nodes live in the
//! side's slab arena. The slab key doubles as the cancellation handle kept
//! in the order index, making removal O(1) regardless of queue depth.

use market_core::{Order, OrderId, Price, TraderId, Volume};
use slab::Slab;

/// Slab key of a queue node; stored in the order index as the intrusive
/// cancellation handle.
pub(crate) type NodeHandle = usize;

/// A queue node. `prev`/`next` link orders at the same price in arrival
/// order.
#[derive(Debug, Clone)]
pub(crate) struct OrderNode {
    pub(crate) order: Order,
    prev: Option<NodeHandle>,
    next: Option<NodeHandle>,
}

/// One fill produced while matching against a level head.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelFill {
    pub(crate) maker_order: OrderId,
    pub(crate) maker_trader: TraderId,
    pub(crate) volume: Volume,
    /// Maker fully filled and removed from the queue
    pub(crate) exhausted: bool,
}

/// All resting orders at a single price, FIFO by arrival sequence.
///
/// Invariants: `volume` equals the sum of residual volumes of the queued
/// orders, and the head is the next order to execute under price-time
/// priority.
#[derive(Debug)]
pub(crate) struct PriceLevel {
    price: Price,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
    volume: u64,
    len: usize,
}

impl PriceLevel {
    pub(crate) fn new(price: Price) -> Self {
        Self {
            price,
            head: None,
            tail: None,
            volume: 0,
            len: 0,
        }
    }

    pub(crate) fn price(&self) -> Price {
        self.price
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Total residual volume at this level
    pub(crate) fn volume(&self) -> u64 {
        self.volume
    }

    pub(crate) fn front(&self) -> Option<NodeHandle> {
        self.head
    }

    /// Append to the queue tail. O(1).
    pub(crate) fn push_back(&mut self, arena: &mut Slab<OrderNode>, order: Order) -> NodeHandle {
        let volume = order.volume.get();
        let handle = arena.insert(OrderNode {
            order,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => arena[tail].next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.volume += volume;
        self.len += 1;
        handle
    }

    /// Unlink a node anywhere in the queue. O(1) given the handle.
    pub(crate) fn unlink(&mut self, arena: &mut Slab<OrderNode>, handle: NodeHandle) -> Order {
        let node = arena.remove(handle);
        match node.prev {
            Some(prev) => arena[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => arena[next].prev = node.prev,
            None => self.tail = node.prev,
        }
        self.volume -= node.order.volume.get();
        self.len -= 1;
        node.order
    }

    /// Match an incoming residual against the queue head until either is
    /// exhausted. Fully-filled makers are popped; a partially-filled head
    /// keeps its queue position with reduced residual.
    pub(crate) fn fill(&mut self, arena: &mut Slab<OrderNode>, incoming: &mut Volume) -> Vec<LevelFill> {
        let mut fills = Vec::new();
        while !incoming.is_zero() {
            let Some(head) = self.head else { break };
            let traded = {
                let maker = &mut arena[head].order;
                let traded = maker.volume.min(*incoming);
                maker.volume -= traded;
                traded
            };
            *incoming -= traded;
            self.volume -= traded.get();

            let maker = arena[head].order;
            let exhausted = maker.volume.is_zero();
            fills.push(LevelFill {
                maker_order: maker.id,
                maker_trader: maker.trader_id,
                volume: traded,
                exhausted,
            });
            if exhausted {
                self.unlink(arena, head);
            }
        }
        fills
    }
}
