//! Market regime parameters.

use serde::{Deserialize, Serialize};

/// A point in the regime grid: fundamental volatility and the fraction of
/// order flow trading in the direction of the mispricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    /// Per-tick standard deviation of the fundamental walk
    pub sigma: f64,
    /// Informed fraction in [0, 1]
    pub informed_fraction: f64,
}

impl Regime {
    pub fn new(sigma: f64, informed_fraction: f64) -> Self {
        Self {
            sigma,
            informed_fraction,
        }
    }

    /// Cartesian product of volatility and informed-fraction axes, row
    /// major over sigma
    pub fn grid(sigmas: &[f64], informed_fractions: &[f64]) -> Vec<Regime> {
        sigmas
            .iter()
            .flat_map(|&sigma| {
                informed_fractions
                    .iter()
                    .map(move |&informed_fraction| Regime::new(sigma, informed_fraction))
            })
            .collect()
    }
}
