//! Agent-based market simulation around the matching engine.
//!
//! A latent fundamental follows a random walk, a Poisson stream of
//! informed/noise market orders trades against a monopolistic market
//! maker quoting around an internal mid with linear inventory skew, and a
//! grid-search harness looks for the skew coefficient that optimizes a
//! chosen objective per market regime.
//!
//! A single trajectory is strictly single-threaded; parallelism lives in
//! the regime grid, where each worker owns its engine, agents, and RNGs.

pub mod application;
pub mod domain;

// Re-export key types at crate root
pub use application::agents::{FlowConfig, InformedFlow, MakerConfig, MarketMaker};
pub use application::search::{SearchConfig, log_spaced, optimize_regimes};
pub use application::simulation::{SimulationRunner, TickRecord, Trajectory, TrajectoryConfig};
pub use domain::{FundamentalProcess, Objective, Regime, RegimeResult, TrajectorySummary};
