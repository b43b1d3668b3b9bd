//! Trade receipts delivered to participants.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Price, TraderId, Volume};

/// One fill, emitted once per maker matched and delivered to both the
/// taker's and the maker's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub taker_id: TraderId,
    pub maker_id: TraderId,
    /// Execution price: the maker's resting price
    pub price: Price,
    pub volume: Volume,
    /// True when the aggressing order was a buy
    pub taker_is_bid: bool,
    /// Engine's global sequence number at emission
    pub engine_sequence: u64,
}

impl TradeReceipt {
    /// Signed executed volume from `trader`'s perspective: positive when
    /// the trader bought, negative when it sold. A self-trade nets to zero.
    pub fn signed_volume_for(&self, trader: TraderId) -> i64 {
        let vol = self.volume.get() as i64;
        let mut signed = 0;
        if self.taker_id == trader {
            signed += if self.taker_is_bid { vol } else { -vol };
        }
        if self.maker_id == trader {
            signed += if self.taker_is_bid { -vol } else { vol };
        }
        signed
    }

    /// Signed dollar flow from `trader`'s perspective: negative when the
    /// trader paid cash (bought), positive when it received cash (sold).
    pub fn signed_notional_for(&self, trader: TraderId) -> i64 {
        -self.signed_volume_for(trader) * self.price.ticks()
    }
}
