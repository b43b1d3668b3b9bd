//! Monopolistic market maker with linear inventory skew.
//!
//! The maker never observes the fundamental. It quotes a fixed spread
//! around an internal mid and shifts both quotes against its inventory:
//!
//! ```text
//! B_t = round(m_t - s/2 - c * I_t * m_t)
//! A_t = round(m_t + s/2 - c * I_t * m_t)
//! ```
//!
//! The next tick's internal mid is the posted mid `(B_t + A_t) / 2`, so
//! the mid drifts purely through the skew term. This feedback loop —
//! informed flow builds inventory, inventory shifts quotes toward the
//! fundamental — is the mechanism under study.

use log::trace;
use market_core::{OrderId, OrderRequest, Price, Side, TradeReceipt, TraderId, Volume};
use matching_engine::{MatchingEngine, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the market maker
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MakerConfig {
    /// Full bid-ask spread in ticks; quotes sit at `m -+ spread/2` before skew
    pub spread: i64,

    /// Linear sensitivity of the quotes to signed dollar inventory
    pub skew_coefficient: f64,

    /// Units per quote
    pub quote_size: u64,

    /// Starting internal mid (equals the fundamental at t = 0)
    pub initial_mid: f64,

    /// Starting cash balance in tick-volume units
    pub initial_cash: i64,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            spread: 2,
            skew_coefficient: 8e-6,
            quote_size: 5,
            initial_mid: 100.0,
            initial_cash: 0,
        }
    }
}

impl MakerConfig {
    pub fn with_spread(mut self, spread: i64) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_skew_coefficient(mut self, skew_coefficient: f64) -> Self {
        self.skew_coefficient = skew_coefficient;
        self
    }

    pub fn with_quote_size(mut self, quote_size: u64) -> Self {
        self.quote_size = quote_size;
        self
    }
}

/// The market-making agent
#[derive(Debug, Clone)]
pub struct MarketMaker {
    config: MakerConfig,
    trader_id: TraderId,
    inventory: i64,
    cash: i64,
    internal_mid: f64,
    resting_bid: Option<OrderId>,
    resting_ask: Option<OrderId>,
    buy_volume: u64,
    sell_volume: u64,
    fills: u64,
}

impl MarketMaker {
    pub const TRADER_ID: TraderId = TraderId::new(1);

    pub fn new(config: MakerConfig) -> Self {
        Self {
            trader_id: Self::TRADER_ID,
            inventory: 0,
            cash: config.initial_cash,
            internal_mid: config.initial_mid,
            resting_bid: None,
            resting_ask: None,
            buy_volume: 0,
            sell_volume: 0,
            fills: 0,
            config,
        }
    }

    /// Cancel the previous quote pair and post a fresh one.
    ///
    /// Cancels may miss (a quote was fully filled since the last cycle);
    /// that is the expected negative-boolean path, not an error.
    pub fn quote(&mut self, engine: &mut MatchingEngine) -> Result<()> {
        if let Some(id) = self.resting_bid.take() {
            engine.cancel_order(id);
        }
        if let Some(id) = self.resting_ask.take() {
            engine.cancel_order(id);
        }

        let mid = self.internal_mid;
        let half = self.config.spread as f64 / 2.0;
        let skew = self.config.skew_coefficient * self.inventory as f64 * mid;
        let mut bid = (mid - half - skew).round() as i64;
        let mut ask = (mid + half - skew).round() as i64;
        if bid >= ask {
            // rounding collapsed the quotes; widen one tick outward around
            // the skewed mid
            let center = (mid - skew).round() as i64;
            bid = center - 1;
            ask = center + 1;
        }
        trace!(
            "maker quote: mid={mid:.3} skew={skew:.4} bid={bid} ask={ask} inventory={}",
            self.inventory
        );

        let size = Volume::new(self.config.quote_size);
        let bid_exec = engine.process_order(OrderRequest::limit(
            self.trader_id,
            Side::Buy,
            Price::from_ticks(bid),
            size,
        ))?;
        let ask_exec = engine.process_order(OrderRequest::limit(
            self.trader_id,
            Side::Sell,
            Price::from_ticks(ask),
            size,
        ))?;
        self.resting_bid = Some(bid_exec.order_id);
        self.resting_ask = Some(ask_exec.order_id);

        // the posted mid becomes the next cycle's internal mid
        self.internal_mid = (bid + ask) as f64 / 2.0;
        Ok(())
    }

    /// Apply this cycle's fills to inventory and cash
    pub fn on_receipts(&mut self, receipts: &[TradeReceipt]) {
        for receipt in receipts {
            let signed = receipt.signed_volume_for(self.trader_id);
            self.inventory += signed;
            self.cash += receipt.signed_notional_for(self.trader_id);
            if signed > 0 {
                self.buy_volume += signed as u64;
            } else {
                self.sell_volume += (-signed) as u64;
            }
            self.fills += 1;
        }
    }

    /// Mark-to-market wealth `C_t + I_t * m_t`
    pub fn wealth(&self) -> f64 {
        self.cash as f64 + self.inventory as f64 * self.internal_mid
    }

    pub fn inventory(&self) -> i64 {
        self.inventory
    }

    pub fn cash(&self) -> i64 {
        self.cash
    }

    pub fn internal_mid(&self) -> f64 {
        self.internal_mid
    }

    pub fn fills(&self) -> u64 {
        self.fills
    }

    pub fn buy_volume(&self) -> u64 {
        self.buy_volume
    }

    pub fn sell_volume(&self) -> u64 {
        self.sell_volume
    }
}
