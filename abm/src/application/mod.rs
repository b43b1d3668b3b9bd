//! Application layer: agents and orchestration
//!
//! Contains:
//! - **agents**: the market maker and the informed/noise flow generator
//! - **simulation**: the per-tick trajectory runner
//! - **search**: the two-stage grid search over skew coefficients

pub mod agents;
pub mod search;
pub mod simulation;
