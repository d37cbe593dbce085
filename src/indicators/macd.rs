// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(fast) - EMA(slow)
//   Signal    = EMA(signal) of the MACD line
//   Histogram = MACD - Signal
//
// The line is defined from index `slow - 1`; the signal (and histogram) from
// index `slow + signal - 2`.
// =============================================================================

use serde::Serialize;

use crate::indicators::ema::{calculate_ema, calculate_ema_of_defined};

/// The coupled MACD outputs, each aligned to the input bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calculate_macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let fast = calculate_ema(closes, fast_period);
    let slow = calculate_ema(closes, slow_period);

    let macd: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| f.zip(*s).map(|(f, s)| f - s))
        .collect();
    let signal = calculate_ema_of_defined(&macd, signal_period);
    let histogram = macd
        .iter()
        .zip(&signal)
        .map(|(m, s)| m.zip(*s).map(|(m, s)| m - s))
        .collect();

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}
