//! Summary records: the contract between the core and external analysis.
//!
//! Field sets and serialization order are stable so downstream consumers
//! (tables, regression post-processing) are insulated from code changes.

use serde::{Deserialize, Serialize};

use super::Regime;

/// Per-trajectory summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub regime: Regime,
    pub skew_coefficient: f64,
    /// Ticks simulated
    pub horizon: u64,
    /// Mean per-tick wealth increment
    pub mean_return: f64,
    pub final_wealth: f64,
    /// Mean of `(m_t - S_t)^2` over the trajectory
    pub mean_squared_distance: f64,
    pub final_inventory: i64,
    /// Fills the maker participated in
    pub num_trades: u64,
    /// Wealth went non-finite or inventory breached the guard
    pub diverged: bool,
}

/// Objective optimized by the grid search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    MeanReturn,
    FinalWealth,
    /// Tracking error between the maker's mid and the fundamental;
    /// minimized, unlike the wealth objectives
    MeanSquaredDistance,
}

impl Objective {
    pub fn extract(self, summary: &TrajectorySummary) -> f64 {
        match self {
            Objective::MeanReturn => summary.mean_return,
            Objective::FinalWealth => summary.final_wealth,
            Objective::MeanSquaredDistance => summary.mean_squared_distance,
        }
    }

    pub const fn is_maximizing(self) -> bool {
        !matches!(self, Objective::MeanSquaredDistance)
    }
}

/// One output row per (regime, objective).
///
/// `None` in both optional fields is the sentinel for a regime whose
/// search failed or produced no usable candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime: Regime,
    pub objective: Objective,
    pub optimal_skew: Option<f64>,
    pub objective_value: Option<f64>,
}

impl RegimeResult {
    pub fn sentinel(regime: Regime, objective: Objective) -> Self {
        Self {
            regime,
            objective,
            optimal_skew: None,
            objective_value: None,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.optimal_skew.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> TrajectorySummary {
        TrajectorySummary {
            regime: Regime::new(0.05, 0.5),
            skew_coefficient: 1e-5,
            horizon: 1000,
            mean_return: 0.25,
            final_wealth: 250.0,
            mean_squared_distance: 1.5,
            final_inventory: -3,
            num_trades: 420,
            diverged: false,
        }
    }

    #[test]
    fn test_objective_extraction() {
        let s = summary();
        assert_eq!(Objective::MeanReturn.extract(&s), 0.25);
        assert_eq!(Objective::FinalWealth.extract(&s), 250.0);
        assert_eq!(Objective::MeanSquaredDistance.extract(&s), 1.5);
    }

    #[test]
    fn test_msd_minimizes() {
        assert!(Objective::MeanReturn.is_maximizing());
        assert!(Objective::FinalWealth.is_maximizing());
        assert!(!Objective::MeanSquaredDistance.is_maximizing());
    }

    #[test]
    fn test_sentinel_is_not_usable() {
        let sentinel = RegimeResult::sentinel(Regime::new(0.01, 0.1), Objective::MeanReturn);
        assert!(!sentinel.is_usable());
    }
}
