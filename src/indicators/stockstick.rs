// =============================================================================
// Stockstick: per-candle up/down classification for chart colouring
// =============================================================================

use crate::market_data::Bar;
use crate::types::Stick;

/// `Up` when the candle closed at or above its open, `Down` otherwise.
pub fn classify_stick(bar: &Bar) -> Stick {
    if bar.close >= bar.open {
        Stick::Up
    } else {
        Stick::Down
    }
}

pub fn classify_sticks(bars: &[Bar]) -> Vec<Stick> {
    bars.iter().map(classify_stick).collect()
}
