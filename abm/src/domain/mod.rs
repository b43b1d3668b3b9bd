//! Model-level concepts: the latent fundamental, market regimes, and the
//! summary records exchanged with external analysis tooling.

mod fundamental;
mod regime;
mod summary;

pub use fundamental::FundamentalProcess;
pub use regime::Regime;
pub use summary::{Objective, RegimeResult, TrajectorySummary};
