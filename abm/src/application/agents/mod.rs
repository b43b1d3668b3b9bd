//! Market participants.
//!
//! Two parties drive every trajectory:
//!
//! - **MarketMaker**: the monopolistic liquidity provider, quoting two
//!   sides around an internal mid with linear inventory skew. Its spread
//!   revenue competes with adverse selection from informed flow.
//! - **InformedFlow**: the stochastic order stream. Each arrival is either
//!   informed (trades toward the fundamental) or noise (random side).

mod informed_flow;
mod market_maker;

pub use informed_flow::{FlowConfig, InformedFlow};
pub use market_maker::{MakerConfig, MarketMaker};
