// =============================================================================
// Keltner Channels
// =============================================================================
//
//   middle = SMA(close, period)
//   upper  = middle + k * ATR(period)
//   lower  = middle - k * ATR(period)
// =============================================================================

use crate::indicators::atr::calculate_atr;
use crate::indicators::bollinger::BandSeries;
use crate::indicators::sma::calculate_sma;
use crate::market_data::Bar;

/// Calculate bar-aligned Keltner Channels, defined from index `period - 1`.
pub fn calculate_keltner(bars: &[Bar], period: usize, atr_multiplier: f64) -> BandSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let middle = calculate_sma(&closes, period);
    let atr = calculate_atr(bars, period);
    BandSeries::around(middle, &atr, atr_multiplier)
}
