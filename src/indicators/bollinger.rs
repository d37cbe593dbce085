// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the same window.

use serde::Serialize;

use crate::indicators::sma::{calculate_rolling_std, calculate_sma};

/// An (upper, middle, lower) band triple, each aligned to the input bars.
/// Shared by Bollinger Bands and Keltner Channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BandSeries {
    /// Build bands as `middle ± multiplier * width` wherever both are defined.
    pub(crate) fn around(
        middle: Vec<Option<f64>>,
        width: &[Option<f64>],
        multiplier: f64,
    ) -> Self {
        let offset = |w: &Option<f64>, m: &Option<f64>, sign: f64| {
            m.zip(*w).map(|(m, w)| m + sign * multiplier * w)
        };
        let upper = width.iter().zip(&middle).map(|(w, m)| offset(w, m, 1.0)).collect();
        let lower = width.iter().zip(&middle).map(|(w, m)| offset(w, m, -1.0)).collect();
        Self {
            upper,
            middle,
            lower,
        }
    }

    pub fn len(&self) -> usize {
        self.middle.len()
    }
}

/// Calculate bar-aligned Bollinger Bands for `closes`.
///
/// All three bands are `None` for the first `period - 1` positions.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BandSeries {
    let middle = calculate_sma(closes, period);
    let std = calculate_rolling_std(closes, period);
    BandSeries::around(middle, &std, num_std)
}
