// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value (at index `period - 1`) is seeded with the SMA of
// the first `period` closes.
// =============================================================================

/// Compute the bar-aligned EMA of `values` over `period`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `values.len() < period` => all `None`
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(seed);

    let mut prev_ema = seed;
    for (i, &value) in values.iter().enumerate().skip(period) {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        out[i] = Some(ema);
        prev_ema = ema;
    }

    out
}

/// EMA of a series that is itself still warming up (leading `None`s).
///
/// The EMA starts at the first defined value and runs over the contiguous
/// defined stretch that follows; the result is re-aligned to the input.
pub fn calculate_ema_of_defined(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let Some(start) = values.iter().position(Option::is_some) else {
        return out;
    };

    let defined: Vec<f64> = values[start..].iter().map_while(|v| *v).collect();
    for (offset, value) in calculate_ema(&defined, period).into_iter().enumerate() {
        out[start + offset] = value;
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn ema_insufficient_data() {
        let ema = calculate_ema(&[1.0, 2.0], 5);
        assert_eq!(ema, vec![None, None]);
    }

    #[test]
    fn ema_period_equals_length() {
        let ema = calculate_ema(&[2.0, 4.0, 6.0], 3);
        assert_eq!(ema.len(), 3);
        // Should be the SMA = (2+4+6)/3 = 4.0
        assert!((ema[2].unwrap() - 4.0).abs() < 1e-10);
        assert!(ema[..2].iter().all(Option::is_none));
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..=10]: SMA seed = 3.0, multiplier = 1/3.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 5);
        assert_eq!(ema.len(), 10);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        assert!((ema[4].unwrap() - expected).abs() < 1e-10);
        for i in 5..10 {
            expected = closes[i] * mult + expected * (1.0 - mult);
            assert!((ema[i].unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn ema_of_defined_skips_leading_gap() {
        let values = [None, None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let ema = calculate_ema_of_defined(&values, 2);
        assert_eq!(ema[..3], [None, None, None]);
        assert!((ema[3].unwrap() - 1.5).abs() < 1e-10);
        assert_eq!(ema.len(), values.len());
    }

    #[test]
    fn ema_of_all_undefined() {
        let ema = calculate_ema_of_defined(&[None, None, None], 2);
        assert_eq!(ema, vec![None, None, None]);
    }
}
