//! Skew-coefficient optimization across market regimes.

mod grid;

pub use grid::{SearchConfig, log_spaced, optimize_regimes};
