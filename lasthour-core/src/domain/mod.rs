//! Domain types: price bars, direction, trade windows.

pub mod bar;
pub mod direction;
pub mod window;

pub use bar::{partition_days, PriceBar};
pub use direction::{Direction, ParseDirectionError};
pub use window::{TradeWindow, WindowBar};
