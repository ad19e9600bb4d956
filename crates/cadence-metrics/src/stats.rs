//! Percentile statistics shared by the throughput, cycle-time, and
//! forecast consumers.
//!
//! Quantiles use linear-interpolation sample-quantile estimation
//! (`h = (n - 1) * p`), not nearest-rank. Each consumer picks its marker
//! set by sample size; small samples get fewer markers, and fewer than
//! five values get none at all. Empty input always yields empty output,
//! never an error.

use serde::{Deserialize, Serialize};

/// One percentile marker. Results are ordered highest percentile first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentile {
    /// Percentile point, 0-100.
    pub percentile: f64,
    pub value: f64,
}

// Marker sets by sample-size floor, widest tier first, all descending.
const SUMMARY_TIERS: &[(usize, &[f64])] = &[
    (20, &[85.0, 70.0, 50.0, 30.0, 15.0]),
    (10, &[85.0, 70.0, 50.0, 30.0]),
    (5, &[50.0]),
];
const CYCLE_TIME_TIERS: &[(usize, &[f64])] = &[
    (20, &[95.0, 85.0, 70.0, 50.0]),
    (10, &[85.0, 70.0, 50.0]),
    (5, &[50.0]),
];
const THROUGHPUT_TIERS: &[(usize, &[f64])] = &[
    (20, &[85.0, 70.0, 50.0, 30.0, 15.0]),
    (10, &[70.0, 50.0, 30.0]),
    (5, &[50.0]),
];

fn tiered(tiers: &'static [(usize, &'static [f64])], n: usize) -> &'static [f64] {
    tiers
        .iter()
        .find(|(floor, _)| n >= *floor)
        .map_or(&[], |(_, points)| points)
}

/// Linear-interpolation sample quantile at `percentile` (0-100).
/// `None` for empty input.
#[must_use]
pub fn quantile(values: &[f64], percentile: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, percentile)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantile_sorted(sorted: &[f64], percentile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * percentile / 100.0;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    let lo_value = sorted[lo];
    let hi_value = sorted.get(lo + 1).copied().unwrap_or(lo_value);
    Some(frac.mul_add(hi_value - lo_value, lo_value))
}

/// Quantile markers at the given percentile points, in the given order.
#[must_use]
pub fn percentiles(values: &[f64], points: &[f64]) -> Vec<Percentile> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    points
        .iter()
        .filter_map(|&p| {
            quantile_sorted(&sorted, p).map(|value| Percentile {
                percentile: p,
                value,
            })
        })
        .collect()
}

/// General summary markers (forecast and scatter consumers), descending.
#[must_use]
pub fn summary_percentiles(values: &[f64]) -> Vec<Percentile> {
    percentiles(values, tiered(SUMMARY_TIERS, values.len()))
}

/// Cycle-time summary markers, descending.
#[must_use]
pub fn cycle_time_percentiles(values: &[f64]) -> Vec<Percentile> {
    percentiles(values, tiered(CYCLE_TIME_TIERS, values.len()))
}

/// Per-bucket throughput markers, descending.
#[must_use]
pub fn throughput_percentiles(values: &[f64]) -> Vec<Percentile> {
    percentiles(values, tiered(THROUGHPUT_TIERS, values.len()))
}

/// Tukey fence: `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`. Values strictly outside
/// the fence are outliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TukeyFence {
    pub lower: f64,
    pub upper: f64,
}

impl TukeyFence {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Compute the Tukey fence over a value set. `None` for empty input.
#[must_use]
pub fn tukey_fence(values: &[f64]) -> Option<TukeyFence> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&sorted, 25.0)?;
    let q3 = quantile_sorted(&sorted, 75.0)?;
    let iqr = q3 - q1;
    Some(TukeyFence {
        lower: 1.5f64.mul_add(-iqr, q1),
        upper: 1.5f64.mul_add(iqr, q3),
    })
}

/// The items inside the Tukey fence. Together with [`outliers`] under the
/// same `value_of`, this partitions the input exactly.
pub fn exclude_outliers<T, F: Fn(&T) -> f64>(items: Vec<T>, value_of: F) -> Vec<T> {
    let Some(fence) = fence_of(&items, &value_of) else {
        return items;
    };
    items
        .into_iter()
        .filter(|item| fence.contains(value_of(item)))
        .collect()
}

/// The items strictly outside the Tukey fence.
pub fn outliers<T, F: Fn(&T) -> f64>(items: Vec<T>, value_of: F) -> Vec<T> {
    let Some(fence) = fence_of(&items, &value_of) else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter(|item| !fence.contains(value_of(item)))
        .collect()
}

fn fence_of<T, F: Fn(&T) -> f64>(items: &[T], value_of: &F) -> Option<TukeyFence> {
    let values: Vec<f64> = items.iter().map(value_of).collect();
    tukey_fence(&values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_values_get_only_the_median() {
        let got = summary_percentiles(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(
            got,
            vec![Percentile {
                percentile: 50.0,
                value: 5.0
            }]
        );
    }

    #[test]
    fn ten_values_get_the_wider_descending_set() {
        let values = [0.0, 2.0, 4.0, 4.0, 5.0, 6.0, 7.0, 8.0, 8.0, 10.0];
        let got = summary_percentiles(&values);
        let expected = [(85.0, 8.0), (70.0, 7.3), (50.0, 5.5), (30.0, 4.0)];
        assert_eq!(got.len(), expected.len());
        for (p, (percentile, value)) in got.iter().zip(expected) {
            assert!((p.percentile - percentile).abs() < 1e-9);
            assert!((p.value - value).abs() < 1e-9, "p{percentile}: {}", p.value);
        }
    }

    #[test]
    fn fewer_than_five_values_get_nothing() {
        assert!(summary_percentiles(&[1.0, 2.0, 3.0, 4.0]).is_empty());
        assert!(summary_percentiles(&[]).is_empty());
    }

    #[test]
    fn unsorted_input_is_handled() {
        let got = summary_percentiles(&[9.0, 1.0, 5.0, 7.0, 3.0]);
        assert_eq!(got[0].value, 5.0);
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let values = [0.0, 2.0, 4.0, 4.0, 5.0, 6.0, 7.0, 8.0, 8.0, 10.0];
        let q = quantile(&values, 70.0).expect("non-empty");
        assert!((q - 7.3).abs() < 1e-9);
    }

    #[test]
    fn throughput_tier_is_narrower_at_ten() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let points: Vec<f64> = throughput_percentiles(&values)
            .iter()
            .map(|p| p.percentile)
            .collect();
        assert_eq!(points, vec![70.0, 50.0, 30.0]);
    }

    #[test]
    fn cycle_time_tier_adds_p95_at_twenty() {
        let values: Vec<f64> = (0..20).map(f64::from).collect();
        let points: Vec<f64> = cycle_time_percentiles(&values)
            .iter()
            .map(|p| p.percentile)
            .collect();
        assert_eq!(points, vec![95.0, 85.0, 70.0, 50.0]);
    }

    #[test]
    fn tukey_fence_flags_far_values() {
        let mut values: Vec<f64> = vec![10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 10.0, 12.0];
        values.push(100.0);

        let inliers = exclude_outliers(values.clone(), |v| *v);
        let out = outliers(values.clone(), |v| *v);

        assert_eq!(out, vec![100.0]);
        assert_eq!(inliers.len() + out.len(), values.len());
    }

    #[test]
    fn empty_input_yields_no_outliers() {
        let empty: Vec<f64> = vec![];
        assert!(outliers(empty.clone(), |v| *v).is_empty());
        assert!(exclude_outliers(empty, |v| *v).is_empty());
    }
}
