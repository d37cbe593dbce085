// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator functions over price slices.  Every public
// function returns exactly one value per input bar: `None` marks warm-up
// positions (or positions where the value is numerically undefined) so the
// renderer can align the output with the bars it plotted.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod error;
pub mod keltner;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod series;
pub mod sma;
pub mod stockstick;
pub mod supertrend;
pub mod swing;
pub mod zigzag;

pub use error::IndicatorError;
pub use series::IndicatorSeries;
