// =============================================================================
// Simple Moving Average (SMA) and rolling standard deviation
// =============================================================================
//
//   SMA_t = (x_{t-n+1} + ... + x_t) / n
//
// Each window is summed on its own rather than with a running total, so that
// `SMA(1)` reproduces its input exactly and long series do not accumulate
// subtraction drift.
// =============================================================================

/// Compute the bar-aligned SMA of `values` over `period`.
///
/// Positions `0..period - 1` are `None`.  `period == 0` or an input shorter
/// than `period` yields all `None`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let period_f = period as f64;
    for (start, window) in values.windows(period).enumerate() {
        out[start + period - 1] = Some(window.iter().sum::<f64>() / period_f);
    }
    out
}

/// Population standard deviation of each `period`-wide window, aligned the
/// same way as [`calculate_sma`].
pub fn calculate_rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let period_f = period as f64;
    for (start, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period_f;
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f;
        out[start + period - 1] = Some(variance.sqrt());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_shorter_than_period_is_all_undefined() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let sma = calculate_sma(&closes, 5);
        assert_eq!(sma.len(), 4);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn sma_period_zero() {
        assert!(calculate_sma(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn sma_one_is_identity() {
        let closes = [101.37, 99.91, 0.1 + 0.2, -4.5, 1e12 + 0.25];
        let sma = calculate_sma(&closes, 1);
        for (got, &expected) in sma.iter().zip(closes.iter()) {
            assert_eq!(*got, Some(expected));
        }
    }

    #[test]
    fn sma_known_values() {
        let closes: Vec<f64> = (1..=6).map(f64::from).collect();
        let sma = calculate_sma(&closes, 3);
        assert_eq!(sma, vec![None, None, Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
    }

    #[test]
    fn rolling_std_flat_is_zero() {
        let std = calculate_rolling_std(&[5.0; 10], 4);
        assert!(std[..3].iter().all(Option::is_none));
        for v in &std[3..] {
            assert!(v.unwrap().abs() < 1e-12);
        }
    }

    #[test]
    fn rolling_std_known_value() {
        // Population σ of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = calculate_rolling_std(&values, 8);
        assert!((std[7].unwrap() - 2.0).abs() < 1e-12);
    }
}
