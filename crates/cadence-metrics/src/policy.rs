//! Cycle-time policies.
//!
//! A policy decides which time ranges of an issue's history count as
//! in-progress. Policies are long-lived configuration: they survive
//! syncs, and a sync can invalidate them by renaming or removing
//! statuses. A stale policy is never an error; it is rebuilt from the
//! default-selected workflow stages on the spot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use cadence_core::{Issue, Status};

use crate::workflow::WorkflowStage;

/// Whether a filter list names the items to keep or the items to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Include,
    Exclude,
}

/// Selects which child issues of an epic feed its computed metrics.
/// Empty lists impose no constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildFilter {
    pub labels: Vec<String>,
    pub label_mode: FilterMode,
    pub issue_types: Vec<String>,
    pub issue_type_mode: FilterMode,
}

impl Default for ChildFilter {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            label_mode: FilterMode::Include,
            issue_types: Vec::new(),
            issue_type_mode: FilterMode::Include,
        }
    }
}

impl ChildFilter {
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        let has_label = issue.labels.iter().any(|l| self.labels.contains(l));
        let label_ok = self.labels.is_empty()
            || match self.label_mode {
                FilterMode::Include => has_label,
                FilterMode::Exclude => !has_label,
            };

        let has_type = self.issue_types.contains(&issue.issue_type);
        let type_ok = self.issue_types.is_empty()
            || match self.issue_type_mode {
                FilterMode::Include => has_type,
                FilterMode::Exclude => !has_type,
            };

        label_ok && type_ok
    }
}

/// How cycle time is derived for an issue.
///
/// A tagged union with an explicit discriminant; each evaluator branch
/// sees only the fields legal for its tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CycleTimePolicy {
    /// Cycle time is the span the issue spends in the selected statuses,
    /// optionally including the wait in ToDo-category statuses before
    /// the first selected one.
    Status {
        statuses: BTreeSet<String>,
        include_wait_time: bool,
    },
    /// Epics only: cycle time derives from the metrics of child issues
    /// matching the filter, not from the epic's own history.
    Computed { child_filter: ChildFilter },
}

impl CycleTimePolicy {
    /// A `Status` policy is valid only while every status name it
    /// references still exists in the canonical status set. `Computed`
    /// policies reference no statuses and are always valid.
    #[must_use]
    pub fn is_valid(&self, statuses: &[Status]) -> bool {
        match self {
            Self::Status { statuses: selected, .. } => selected
                .iter()
                .all(|name| statuses.iter().any(|s| &s.name == name)),
            Self::Computed { .. } => true,
        }
    }
}

/// The default policy for a workflow: the union of statuses in
/// `select_by_default` stages, wait time excluded.
#[must_use]
pub fn default_policy(stages: &[WorkflowStage]) -> CycleTimePolicy {
    let statuses: BTreeSet<String> = stages
        .iter()
        .filter(|stage| stage.select_by_default)
        .flat_map(|stage| stage.statuses.iter().map(|s| s.name.clone()))
        .collect();
    CycleTimePolicy::Status {
        statuses,
        include_wait_time: false,
    }
}

/// Validate `policy` against the current canonical status set, rebuilding
/// it from the default-selected stages when stale.
///
/// Re-validating an already-valid policy is a no-op, so the rebuild is
/// idempotent. Staleness is recovered locally and never surfaced as an
/// error.
#[must_use]
pub fn ensure_valid(
    policy: CycleTimePolicy,
    stages: &[WorkflowStage],
    statuses: &[Status],
) -> CycleTimePolicy {
    if policy.is_valid(statuses) {
        return policy;
    }
    tracing::warn!("cycle-time policy references statuses no longer in the workflow; rebuilding from default stages");
    default_policy(stages)
}
