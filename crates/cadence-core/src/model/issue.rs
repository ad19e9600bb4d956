use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{HierarchyLevel, Status, StatusCategory};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Elapsed time between two instants in fractional days.
#[must_use]
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / (SECONDS_PER_DAY * 1_000.0)
}

/// One entry in an issue's reconstructed status history.
///
/// Transitions for an issue are ordered ascending by `date` and form a
/// gap-free chain: each transition's `to_status` is the next one's
/// `from_status`. The leading transition has `from_status == None`,
/// standing for item creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Status the item left, or `None` for the synthetic creation entry.
    pub from_status: Option<Status>,
    /// Status the item entered.
    pub to_status: Status,
    /// When the item entered `to_status`.
    pub date: DateTime<Utc>,
    /// When the item left `to_status`. For the final transition of an
    /// item that is not Done-category this is the sync's "now"; for a
    /// Done-category item it stays at the last observed change time.
    pub until: DateTime<Utc>,
    /// `until - date` in fractional days.
    pub time_in_status_days: f64,
}

/// Policy-derived flow metrics. Recomputed whenever a policy is applied;
/// never part of raw tracker input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// When the item is considered to have started, under the active policy.
    pub started: Option<DateTime<Utc>>,
    /// When the item is considered done. Undefined while the item is open.
    pub completed: Option<DateTime<Utc>>,
    /// `completed - started` in fractional days, when both are defined.
    pub cycle_time_days: Option<f64>,
}

/// A work item with its reconstructed status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub issue_type: String,
    pub hierarchy_level: HierarchyLevel,
    /// Current canonical status.
    pub status: Status,
    /// Category of the current status, for cheap filtering.
    pub status_category: StatusCategory,
    pub created: DateTime<Utc>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    /// Key of the parent epic, for story-level items that have one.
    pub parent_key: Option<String>,
    /// Display link on the tracker.
    pub url: String,
    pub transitions: Vec<Transition>,
    pub metrics: FlowMetrics,
}

impl Issue {
    /// The last time the item was pushed back to a not-started state:
    /// the `until` of the most recent transition into a ToDo-category
    /// status from a non-ToDo one. `None` for items never pushed back.
    #[must_use]
    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.transitions
            .iter()
            .rev()
            .find(|t| {
                t.to_status.category == StatusCategory::ToDo
                    && t.from_status
                        .as_ref()
                        .is_some_and(|f| f.category != StatusCategory::ToDo)
            })
            .map(|t| t.until)
    }
}
