// =============================================================================
// Rate of Change (ROC), Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// Positive ROC indicates upward momentum; negative indicates downward.

/// Calculate ROC aligned with `closes`.
///
/// `None` for the first `period` positions and wherever the base price is
/// zero.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 {
        return result;
    }

    for i in period..closes.len() {
        let base = closes[i - period];
        if base != 0.0 {
            result[i] = Some((closes[i] - base) / base * 100.0);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roc_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let roc = calculate_roc(&closes, 14);
        assert_eq!(roc.len(), 20);
        assert!(roc[..14].iter().all(Option::is_none));
        // From 1 to 15: ROC = (15-1)/1 * 100 = 1400%
        assert!((roc[14].unwrap() - 1400.0).abs() < 1e-10);
    }

    #[test]
    fn roc_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(calculate_roc(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn roc_zero_base_is_undefined() {
        let roc = calculate_roc(&[0.0, 5.0, 10.0], 1);
        assert_eq!(roc, vec![None, None, Some(100.0)]);
    }
}
