//! Per-day work-in-progress series.
//!
//! Two counting algorithms over the same day grid:
//!
//! - **LeadTime**: an issue counts between its `started` and `completed`
//!   metrics. Paused issues still count; the algorithm only tracks the
//!   endpoints.
//! - **Status**: an issue counts on days it actually sat in an
//!   InProgress-category status. An issue parked back in ToDo does not
//!   count, even if never formally completed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::{Issue, StatusCategory};

/// WIP counting algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipAlgorithm {
    LeadTime,
    Status,
}

/// An absolute half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One day of the WIP series. `issues` is the exact counted subset, for
/// drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipDatum {
    pub date: DateTime<Utc>,
    pub count: usize,
    pub issues: Vec<String>,
}

/// Compute the per-day WIP series over `[range.start, range.end)`.
///
/// Only issues with a defined `started` metric are considered. When
/// `include_stopped` is false, issues stopped (pushed back to a
/// not-started state) before the range start are excluded as well. A
/// zero-width range yields an empty series.
#[must_use]
pub fn wip(
    issues: &[Issue],
    algorithm: WipAlgorithm,
    range: &DateRange,
    include_stopped: bool,
) -> Vec<WipDatum> {
    let candidates: Vec<&Issue> = issues
        .iter()
        .filter(|issue| issue.metrics.started.is_some())
        .filter(|issue| {
            include_stopped || !issue.stopped_at().is_some_and(|stopped| stopped < range.start)
        })
        .collect();

    let mut series = Vec::new();
    let mut day = range.start;
    while day < range.end {
        let counted: Vec<&Issue> = candidates
            .iter()
            .copied()
            .filter(|issue| counts_on(issue, algorithm, day))
            .collect();
        series.push(WipDatum {
            date: day,
            count: counted.len(),
            issues: counted.into_iter().map(|i| i.key.clone()).collect(),
        });
        day += Duration::days(1);
    }
    series
}

fn counts_on(issue: &Issue, algorithm: WipAlgorithm, day: DateTime<Utc>) -> bool {
    match algorithm {
        WipAlgorithm::LeadTime => {
            issue.metrics.started.is_some_and(|started| started < day)
                && issue.metrics.completed.is_none_or(|completed| completed > day)
        }
        WipAlgorithm::Status => issue.transitions.iter().any(|t| {
            t.to_status.category == StatusCategory::InProgress && t.date < day && day < t.until
        }),
    }
}
