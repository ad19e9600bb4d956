//! Time-bucketed throughput: completions per day, week, fortnight, or
//! calendar month, with percentile markers over the bucket counts.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::Issue;

use crate::stats::{throughput_percentiles, Percentile};
use crate::wip::DateRange;

/// Width of one throughput bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketWidth {
    Day,
    Week,
    Fortnight,
    Month,
}

impl BucketWidth {
    /// Start of the bucket after one starting at `from`. Months follow
    /// the calendar; the other widths are fixed.
    #[must_use]
    pub fn advance(self, from: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Day => from + Duration::days(1),
            Self::Week => from + Duration::days(7),
            Self::Fortnight => from + Duration::days(14),
            Self::Month => from + Months::new(1),
        }
    }
}

/// One bucket of the throughput series. `issues` is the exact set of
/// keys completed in the bucket, for drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputDatum {
    /// Bucket start.
    pub date: DateTime<Utc>,
    pub count: usize,
    pub issues: Vec<String>,
}

/// Bucketed completion counts plus percentile markers over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputResult {
    pub data: Vec<ThroughputDatum>,
    /// Markers over the per-bucket counts, highest percentile first.
    /// Empty below five buckets.
    pub percentiles: Vec<Percentile>,
}

/// Partition `[range.start, range.end]` into contiguous buckets of
/// `width` starting at `range.start` and count completed issues per
/// bucket (an issue lands in the bucket whose `[start, end)` span holds
/// its `completed` metric). Issues without a `completed` metric are
/// ignored.
#[must_use]
pub fn throughput(issues: &[Issue], range: &DateRange, width: BucketWidth) -> ThroughputResult {
    let mut data = Vec::new();
    let mut bucket_start = range.start;
    while bucket_start <= range.end {
        let bucket_end = width.advance(bucket_start);
        let completed: Vec<&Issue> = issues
            .iter()
            .filter(|issue| {
                issue
                    .metrics
                    .completed
                    .is_some_and(|done| done >= bucket_start && done < bucket_end)
            })
            .collect();
        data.push(ThroughputDatum {
            date: bucket_start,
            count: completed.len(),
            issues: completed.into_iter().map(|i| i.key.clone()).collect(),
        });
        bucket_start = bucket_end;
    }

    let counts: Vec<f64> = data.iter().map(|d| d.count as f64).collect();
    ThroughputResult {
        percentiles: throughput_percentiles(&counts),
        data,
    }
}
