// =============================================================================
// ZigZag
// =============================================================================
//
// Collapses the close series into alternating swing pivots.  One pass:
//
//   - bar 0 is the origin pivot
//   - the first move of at least `change_pct` percent away from the origin
//     opens the first leg
//   - a leg extends while price makes a new extreme in its direction
//   - a counter move of at least `change_pct` percent from the running
//     extreme commits that extreme as a pivot and opens the opposite leg
//   - at the end, the open leg's extreme is emitted as well when it lies at
//     least `change_pct` percent away from the last committed pivot
//
// Output is sparse: pivot price at pivot bars, `None` everywhere else.
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Flat,
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy)]
struct Extreme {
    index: usize,
    price: f64,
}

/// Percentage move from `base` to `price`; `None` for a zero base.
fn pct_change(base: f64, price: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some((price - base) / base * 100.0)
}

/// Calculate ZigZag pivots over `closes` with reversal threshold `change_pct`.
pub fn calculate_zigzag(closes: &[f64], change_pct: f64) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    let Some(&first) = closes.first() else {
        return out;
    };
    if change_pct.is_nan() || change_pct <= 0.0 {
        return out;
    }

    out[0] = Some(first);
    let mut pivot = Extreme {
        index: 0,
        price: first,
    };
    let mut extreme = pivot;
    let mut leg = Leg::Flat;

    for (index, &price) in closes.iter().enumerate().skip(1) {
        let here = Extreme { index, price };
        match leg {
            Leg::Flat => {
                leg = match pct_change(pivot.price, price) {
                    Some(c) if c >= change_pct => Leg::Rising,
                    Some(c) if c <= -change_pct => Leg::Falling,
                    _ => continue,
                };
                extreme = here;
            }
            Leg::Rising if price > extreme.price => extreme = here,
            Leg::Falling if price < extreme.price => extreme = here,
            Leg::Rising | Leg::Falling => {
                let reversed = pct_change(extreme.price, price)
                    .is_some_and(|c| c.abs() >= change_pct);
                if reversed {
                    out[extreme.index] = Some(extreme.price);
                    pivot = extreme;
                    extreme = here;
                    leg = if leg == Leg::Rising {
                        Leg::Falling
                    } else {
                        Leg::Rising
                    };
                }
            }
        }
    }

    if leg != Leg::Flat && extreme.index != pivot.index {
        let far_enough =
            pct_change(pivot.price, extreme.price).is_some_and(|c| c.abs() >= change_pct);
        if far_enough {
            out[extreme.index] = Some(extreme.price);
        }
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
    fn commits_pivots_on_reversal() {
        let closes = [100.0, 110.0, 120.0, 105.0, 100.0, 115.0, 130.0, 125.0];
        let zz = calculate_zigzag(&closes, 10.0);
        assert_eq!(
            zz,
            vec![
                Some(100.0),
                None,
                Some(120.0),
                None,
                Some(100.0),
                None,
                Some(130.0),
                None
            ]
        );
    }

    #[test]
    fn pivots_alternate_direction() {
        let closes: Vec<f64> = (0..200)
            .map(|i| {
                let t = i as f64;
                100.0 + (t * 0.11).sin() * 15.0 + (t * 0.37).cos() * 4.0
            })
            .collect();
        let pivots: Vec<f64> = calculate_zigzag(&closes, 3.0).into_iter().flatten().collect();
        assert!(pivots.len() > 3);
        let moves: Vec<f64> = pivots.windows(2).map(|w| w[1] - w[0]).collect();
        for pair in moves.windows(2) {
            assert!(pair[0] * pair[1] < 0.0, "consecutive legs share direction: {pair:?}");
        }
    }

    #[test]
    fn small_trailing_move_is_not_a_pivot() {
        let zz = calculate_zigzag(&[100.0, 103.0, 102.0], 5.0);
        assert_eq!(zz, vec![Some(100.0), None, None]);
    }

    #[test]
    fn first_leg_needs_full_threshold() {
        // The 0.1% dip must not open a falling leg that hides the rally.
        let zz = calculate_zigzag(&[100.0, 99.9, 150.0], 5.0);
        assert_eq!(zz, vec![Some(100.0), None, Some(150.0)]);
    }

    #[test]
    fn flat_series_only_has_origin() {
        let zz = calculate_zigzag(&[50.0; 10], 1.0);
        assert_eq!(zz[0], Some(50.0));
        assert!(zz[1..].iter().all(Option::is_none));
    }

    #[test]
    fn empty_and_invalid_threshold() {
        assert!(calculate_zigzag(&[], 5.0).is_empty());
        assert!(calculate_zigzag(&[1.0, 2.0], 0.0).iter().all(Option::is_none));
        assert!(calculate_zigzag(&[1.0, 2.0], f64::NAN).iter().all(Option::is_none));
    }
}
