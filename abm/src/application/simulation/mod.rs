//! Trajectory simulation.
//!
//! The runner coordinates one fixed-horizon trajectory. Per tick, in a
//! fixed order that is part of the contract:
//!
//! 1. the fundamental advances,
//! 2. the maker cancels its previous pair and requotes,
//! 3. the flow generator emits its market orders, dispatched in emission
//!    order,
//! 4. the maker and the statistics collector drain their receipts, and
//!    the tick's observables are recorded.

mod runner;

pub use runner::{SimulationRunner, TickRecord, Trajectory, TrajectoryConfig};

pub(crate) use runner::split_seed;
