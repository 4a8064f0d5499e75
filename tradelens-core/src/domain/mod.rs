//! Domain types for TradeLens

pub mod bar;
pub mod frame;
pub mod period;

pub use bar::Bar;
pub use frame::OhlcvFrame;
pub use period::{clean_symbol, Interval, Period};

/// Symbol type alias
pub type Symbol = String;
