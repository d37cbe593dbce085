// =============================================================================
// True Range and Average True Range (ATR)
// =============================================================================
//
// True Range (TR) for each bar:
//   TR_0 = H - L                                   (no previous close)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR here is the simple rolling mean of TR over `period` bars, the volatility
// measure SuperTrend and Keltner channels are built on.
// =============================================================================

use crate::indicators::sma::calculate_sma;
use crate::market_data::Bar;

/// True range of every bar, oldest first.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            match i.checked_sub(1).map(|p| bars[p].close) {
                Some(prev_close) => hl
                    .max((bar.high - prev_close).abs())
                    .max((bar.low - prev_close).abs()),
                None => hl,
            }
        })
        .collect()
}

/// Bar-aligned ATR: defined from index `period - 1`.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    calculate_sma(&true_range(bars), period)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::test_bar;

    fn candle(i: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        test_bar(i, open, high, low, close)
    }

    #[test]
    fn atr_period_zero() {
        let bars: Vec<Bar> = (0..20).map(|i| candle(i, 100.0, 105.0, 95.0, 102.0)).collect();
        assert!(calculate_atr(&bars, 0).iter().all(Option::is_none));
    }

    #[test]
    fn atr_insufficient_data() {
        let bars: Vec<Bar> = (0..10).map(|i| candle(i, 100.0, 105.0, 95.0, 102.0)).collect();
        let atr = calculate_atr(&bars, 14);
        assert_eq!(atr.len(), 10);
        assert!(atr.iter().all(Option::is_none));
    }

    #[test]
    fn first_true_range_is_bar_range() {
        let bars = vec![candle(0, 100.0, 104.0, 97.0, 101.0)];
        assert_eq!(true_range(&bars), vec![7.0]);
    }

    #[test]
    fn true_range_uses_prev_close() {
        // Gap scenario: |H - prevClose| > H - L
        let bars = vec![
            candle(0, 100.0, 105.0, 95.0, 95.0),  // close at low
            candle(1, 110.0, 115.0, 108.0, 112.0), // gap up: |115-95|=20 > 115-108=7
        ];
        assert_eq!(true_range(&bars), vec![10.0, 20.0]);
    }

    #[test]
    fn atr_constant_range() {
        // Range 10 with the close at the midpoint and no drift => TR is 10.
        let bars: Vec<Bar> = (0..30).map(|i| candle(i, 100.0, 105.0, 95.0, 100.0)).collect();
        let atr = calculate_atr(&bars, 14);
        assert!(atr[..13].iter().all(Option::is_none));
        for v in atr[13..].iter() {
            assert!((v.unwrap() - 10.0).abs() < 1e-12);
        }
    }

    #[test]
    fn atr_result_is_positive() {
        let bars: Vec<Bar> = (0..50)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.5).sin() * 10.0;
                candle(i, base - 0.5, base + 2.0, base - 2.0, base + 0.5)
            })
            .collect();
        for v in calculate_atr(&bars, 14).into_iter().flatten() {
            assert!(v > 0.0, "ATR must be positive, got {v}");
        }
    }
}
