//! Property tests for the percentile statistics.

use proptest::prelude::*;

use cadence_metrics::{exclude_outliers, outliers, quantile, summary_percentiles};

proptest! {
    /// Markers are strictly descending by percentile and every value
    /// lies within [min, max] of the input.
    #[test]
    fn percentiles_descend_and_stay_in_range(
        values in prop::collection::vec(0.0f64..10_000.0, 0..100)
    ) {
        let markers = summary_percentiles(&values);

        for pair in markers.windows(2) {
            prop_assert!(pair[0].percentile > pair[1].percentile);
        }

        let min = values.iter().copied().reduce(f64::min);
        let max = values.iter().copied().reduce(f64::max);
        match (min, max) {
            (Some(min), Some(max)) => {
                for marker in &markers {
                    prop_assert!(marker.value >= min && marker.value <= max);
                }
            }
            _ => prop_assert!(markers.is_empty()),
        }
    }

    /// `exclude_outliers` and `outliers` under the same value-of
    /// partition the input exactly: no overlap, no omission.
    #[test]
    fn outlier_partition_is_exact(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 0..200)
    ) {
        let kept = exclude_outliers(values.clone(), |v| *v);
        let flagged = outliers(values.clone(), |v| *v);

        prop_assert_eq!(kept.len() + flagged.len(), values.len());

        let mut merged = kept;
        merged.extend(flagged);
        merged.sort_by(f64::total_cmp);
        let mut original = values;
        original.sort_by(f64::total_cmp);
        prop_assert_eq!(merged, original);
    }

    /// The quantile estimator is monotone in the percentile point.
    #[test]
    fn quantile_is_monotone(
        values in prop::collection::vec(0.0f64..100.0, 1..50),
        a in 0.0f64..100.0,
        b in 0.0f64..100.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let q_lo = quantile(&values, lo).expect("non-empty");
        let q_hi = quantile(&values, hi).expect("non-empty");
        prop_assert!(q_lo <= q_hi + 1e-9);
    }
}
