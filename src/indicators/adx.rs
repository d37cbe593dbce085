// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// Output is aligned with the input bars: DI is defined from bar `period`
// (the first `period` bar-to-bar transitions seed the smoothing) and ADX from
// bar `2 * period - 1`.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use serde::Serialize;

use crate::market_data::Bar;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdxSeries {
    pub adx: Vec<Option<f64>>,
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
}

impl AdxSeries {
    fn undefined(len: usize) -> Self {
        Self {
            adx: vec![None; len],
            plus_di: vec![None; len],
            minus_di: vec![None; len],
        }
    }
}

/// Raw directional movement and true range for one bar-to-bar transition.
#[derive(Debug, Clone, Copy)]
struct DirectionalMove {
    plus_dm: f64,
    minus_dm: f64,
    tr: f64,
}

impl DirectionalMove {
    fn between(prev: &Bar, bar: &Bar) -> Self {
        let tr = (bar.high - bar.low)
            .max((bar.high - prev.close).abs())
            .max((bar.low - prev.close).abs());

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;

        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        Self {
            plus_dm,
            minus_dm,
            tr,
        }
    }
}

/// Calculate the ADX family over `bars`.
pub fn calculate_adx(bars: &[Bar], period: usize) -> AdxSeries {
    let n = bars.len();
    let mut out = AdxSeries::undefined(n);
    if period == 0 || n <= period {
        return out;
    }

    let period_f = period as f64;
    // moves[k] is the transition into bar k + 1.
    let moves: Vec<DirectionalMove> = bars
        .windows(2)
        .map(|w| DirectionalMove::between(&w[0], &w[1]))
        .collect();

    let mut smooth_plus_dm: f64 = moves[..period].iter().map(|m| m.plus_dm).sum();
    let mut smooth_minus_dm: f64 = moves[..period].iter().map(|m| m.minus_dm).sum();
    let mut smooth_tr: f64 = moves[..period].iter().map(|m| m.tr).sum();

    let mut dx_seed = 0.0;
    let mut adx: Option<f64> = None;

    for i in period..n {
        if i > period {
            let m = moves[i - 1];
            smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + m.plus_dm;
            smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + m.minus_dm;
            smooth_tr = smooth_tr - smooth_tr / period_f + m.tr;
        }

        let (plus_di, minus_di) = directional_indices(smooth_plus_dm, smooth_minus_dm, smooth_tr);
        out.plus_di[i] = Some(plus_di);
        out.minus_di[i] = Some(minus_di);

        let dx = compute_dx(plus_di, minus_di);
        // DX count so far is i - period + 1; the ADX seed is their mean.
        adx = match adx {
            Some(prev) => Some((prev * (period_f - 1.0) + dx) / period_f),
            None => {
                dx_seed += dx;
                (i + 1 == 2 * period).then(|| dx_seed / period_f)
            }
        };
        out.adx[i] = adx;
    }

    out
}

// =============================================================================
// Internal helpers
// =============================================================================

/// +DI and -DI from smoothed values.  A zero true range (no price movement at
/// all) yields zero for both.
fn directional_indices(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> (f64, f64) {
    if smooth_tr == 0.0 {
        return (0.0, 0.0);
    }
    (
        smooth_plus_dm / smooth_tr * 100.0,
        smooth_minus_dm / smooth_tr * 100.0,
    )
}

fn compute_dx(plus_di: f64, minus_di: f64) -> f64 {
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        // Both +DI and -DI are zero, no directional movement.
        return 0.0;
    }
    (plus_di - minus_di).abs() / di_sum * 100.0
}
