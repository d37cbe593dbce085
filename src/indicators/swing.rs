// =============================================================================
// Swing Highs / Swing Lows
// =============================================================================
//
// Bar `i` is a swing high when `high[i]` is the maximum of the symmetric
// window `high[i-w ..= i+w]`, and a swing low when `low[i]` is the minimum of
// `low[i-w ..= i+w]`.  Bars without a full window on both sides are never
// marked.  Stateless across bars.
// =============================================================================

use serde::Serialize;

use crate::market_data::Bar;

/// Sparse swing markers, price at the swing bar and `None` elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingSeries {
    pub highs: Vec<Option<f64>>,
    pub lows: Vec<Option<f64>>,
}

fn mark_extremes(
    values: &[f64],
    window: usize,
    is_extreme: impl Fn(f64, &[f64]) -> bool,
) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.is_empty() || window > (values.len() - 1) / 2 {
        return out;
    }
    for i in window..values.len() - window {
        if is_extreme(values[i], &values[i - window..=i + window]) {
            out[i] = Some(values[i]);
        }
    }
    out
}

pub fn swing_highs(highs: &[f64], window: usize) -> Vec<Option<f64>> {
    mark_extremes(highs, window, |v, w| w.iter().all(|&x| v >= x))
}

pub fn swing_lows(lows: &[f64], window: usize) -> Vec<Option<f64>> {
    mark_extremes(lows, window, |v, w| w.iter().all(|&x| v <= x))
}

/// Swing highs on `high` and swing lows on `low`.
pub fn calculate_swings(bars: &[Bar], window: usize) -> SwingSeries {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    SwingSeries {
        highs: swing_highs(&highs, window),
        lows: swing_lows(&lows, window),
    }
}
