mod ids;
mod price;
mod side;
mod volume;

pub use ids::{OrderId, TraderId};
pub use price::Price;
pub use side::Side;
pub use volume::Volume;
