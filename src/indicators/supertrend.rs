// =============================================================================
// SuperTrend
// =============================================================================
//
// Candidate bands around the bar midpoint:
//   hl2   = (H + L) / 2
//   upper = hl2 + multiplier * ATR(period)
//   lower = hl2 - multiplier * ATR(period)
//
// The trend is a left fold over the bars.  Each step reads only the state
// committed at the previous bar:
//   close > prev.upper  => up
//   close < prev.lower  => down
//   otherwise           => unchanged, and the emitted band may only tighten
//                          (up: lower = max(lower, prev.lower);
//                           down: upper = min(upper, prev.upper))
// The emitted value is the lower band in an uptrend, the upper band otherwise.
//
// The first bar with a defined ATR has no previous state: the fold is seeded
// there with an uptrend and the raw candidate bands.
// =============================================================================

use serde::Serialize;

use crate::indicators::atr::calculate_atr;
use crate::market_data::Bar;
use crate::types::Trend;

/// Per-bar SuperTrend output.  `value[i]` is always `lower[i]` when
/// `trend[i]` is up and `upper[i]` when it is down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperTrendSeries {
    pub value: Vec<Option<f64>>,
    pub trend: Vec<Option<Trend>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Committed state after one bar: direction plus the final bands.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TrendState {
    trend: Trend,
    upper: f64,
    lower: f64,
}

impl TrendState {
    fn seed(upper: f64, lower: f64) -> Self {
        Self {
            trend: Trend::Up,
            upper,
            lower,
        }
    }

    /// Commit the next bar given its close and candidate bands.
    fn advance(self, close: f64, upper: f64, lower: f64) -> Self {
        if close > self.upper {
            return Self {
                trend: Trend::Up,
                upper,
                lower,
            };
        }
        if close < self.lower {
            return Self {
                trend: Trend::Down,
                upper,
                lower,
            };
        }
        match self.trend {
            Trend::Up => Self {
                trend: Trend::Up,
                upper,
                lower: lower.max(self.lower),
            },
            Trend::Down => Self {
                trend: Trend::Down,
                upper: upper.min(self.upper),
                lower,
            },
        }
    }

    fn emitted(&self) -> f64 {
        match self.trend {
            Trend::Up => self.lower,
            Trend::Down => self.upper,
        }
    }
}

/// Calculate SuperTrend over `bars`.
///
/// Undefined until ATR(`period`) is defined, i.e. for the first
/// `period - 1` bars (all bars when the series is shorter than `period`).
pub fn calculate_supertrend(bars: &[Bar], period: usize, multiplier: f64) -> SuperTrendSeries {
    let atr = calculate_atr(bars, period);

    let states: Vec<Option<TrendState>> = bars
        .iter()
        .zip(&atr)
        .scan(None, |committed: &mut Option<TrendState>, (bar, atr)| {
            let Some(atr) = *atr else {
                return Some(None);
            };
            let hl2 = (bar.high + bar.low) / 2.0;
            let upper = hl2 + multiplier * atr;
            let lower = hl2 - multiplier * atr;

            let next = match *committed {
                None => TrendState::seed(upper, lower),
                Some(prev) => prev.advance(bar.close, upper, lower),
            };
            *committed = Some(next);
            Some(Some(next))
        })
        .collect();

    SuperTrendSeries {
        value: states.iter().map(|s| s.map(|s| s.emitted())).collect(),
        trend: states.iter().map(|s| s.map(|s| s.trend)).collect(),
        upper: states.iter().map(|s| s.map(|s| s.upper)).collect(),
        lower: states.iter().map(|s| s.map(|s| s.lower)).collect(),
    }
}
