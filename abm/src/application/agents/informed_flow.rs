//! Informed/noise order-flow generator.
//!
//! Per tick the stream draws a Poisson number of market orders with
//! uniform volumes. Each order is informed with probability
//! `informed_fraction`: an informed order trades in the direction of the
//! mispricing `sign(S_t - mid_t)`, a noise order picks its side at
//! random. Orders never rest; residuals beyond the book are discarded by
//! the engine.

use market_core::{OrderRequest, Side, TraderId, Volume};
use rand::prelude::*;
use rand_distr::{Distribution, Poisson};

/// Configuration for the flow generator
#[derive(Debug, Clone, Copy)]
pub struct FlowConfig {
    /// Probability in [0, 1] that an arrival trades toward the fundamental
    pub informed_fraction: f64,
    /// Mean arrivals per tick (Poisson rate)
    pub arrival_rate: f64,
    /// Inclusive volume bounds, `1 <= min_volume <= max_volume`
    pub min_volume: u64,
    pub max_volume: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            informed_fraction: 0.5,
            arrival_rate: 12.0,
            min_volume: 1,
            max_volume: 3,
        }
    }
}

/// The order stream for one trajectory
#[derive(Debug, Clone)]
pub struct InformedFlow {
    config: FlowConfig,
    poisson: Option<Poisson<f64>>,
    rng: StdRng,
}

impl InformedFlow {
    /// Trader id stamped on informed arrivals
    pub const INFORMED_TRADER: TraderId = TraderId::new(2);
    /// Trader id stamped on noise arrivals
    pub const NOISE_TRADER: TraderId = TraderId::new(3);

    pub fn new(config: FlowConfig, seed: u64) -> Self {
        debug_assert!(config.min_volume >= 1 && config.min_volume <= config.max_volume);
        Self {
            config,
            // a non-positive rate produces an empty stream
            poisson: Poisson::new(config.arrival_rate).ok(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Market orders for one tick, in emission order.
    ///
    /// `mid` is the current book mid; with no mid (or an exact match with
    /// the fundamental) informed arrivals fall back to a random side.
    pub fn generate(&mut self, fundamental: f64, mid: Option<f64>) -> Vec<OrderRequest> {
        let Some(poisson) = self.poisson.as_ref() else {
            return Vec::new();
        };
        let count = poisson.sample(&mut self.rng) as u64;
        let mut orders = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let volume = self
                .rng
                .gen_range(self.config.min_volume..=self.config.max_volume);
            let informed = self.rng.r#gen::<f64>() < self.config.informed_fraction;
            let side = match mid {
                Some(mid) if informed && fundamental > mid => Side::Buy,
                Some(mid) if informed && fundamental < mid => Side::Sell,
                _ => {
                    if self.rng.r#gen::<bool>() {
                        Side::Buy
                    } else {
                        Side::Sell
                    }
                }
            };
            let trader = if informed {
                Self::INFORMED_TRADER
            } else {
                Self::NOISE_TRADER
            };
            orders.push(OrderRequest::market(trader, side, Volume::new(volume)));
        }
        orders
    }
}
