mod order;
mod receipt;

pub use order::{Order, OrderKind, OrderRequest};
pub use receipt::TradeReceipt;
