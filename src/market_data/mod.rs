pub mod provider;
pub mod series;

pub use provider::{MarketDataError, MarketDataProvider};
pub use series::{Bar, RawBar, Series};
