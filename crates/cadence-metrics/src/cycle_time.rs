//! Cycle-time policy evaluation.
//!
//! Annotates issues with `started` / `completed` / `cycle_time_days`
//! under a given policy. All metrics stay `None` when the policy's
//! conditions are never met; an open item never gets `completed`.

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

use cadence_core::{days_between, FlowMetrics, HierarchyLevel, Issue, StatusCategory};

use crate::policy::{ChildFilter, CycleTimePolicy};

/// Evaluate a `Status` policy against one issue's own history.
#[must_use]
pub fn evaluate_status(
    issue: &Issue,
    selected: &BTreeSet<String>,
    include_wait_time: bool,
) -> FlowMetrics {
    let Some(first) = issue
        .transitions
        .iter()
        .find(|t| selected.contains(&t.to_status.name))
    else {
        return FlowMetrics::default();
    };

    let mut started = first.date;
    if include_wait_time {
        // The moment the item first left its initial waiting state, when
        // that happened before it reached a selected status.
        let left_todo = issue.transitions.iter().find(|t| {
            t.from_status
                .as_ref()
                .is_some_and(|f| f.category == StatusCategory::ToDo)
                && t.to_status.category != StatusCategory::ToDo
        });
        if let Some(depart) = left_todo {
            started = started.min(depart.date);
        }
    }

    let completed: Option<DateTime<Utc>> = if issue.status_category == StatusCategory::Done {
        issue
            .transitions
            .iter()
            .rev()
            .find(|t| selected.contains(&t.to_status.name))
            .map(|t| t.until)
    } else {
        None
    };

    FlowMetrics {
        started: Some(started),
        completed,
        cycle_time_days: completed.map(|done| days_between(started, done)),
    }
}

/// Evaluate a `Computed` policy for an epic over its children's
/// already-computed metrics. Children failing the filter are excluded;
/// no matching children means all-undefined metrics.
#[must_use]
pub fn evaluate_computed<'a, I>(children: I, filter: &ChildFilter) -> FlowMetrics
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut started: Option<DateTime<Utc>> = None;
    let mut completed: Option<DateTime<Utc>> = None;
    let mut any = false;

    for child in children.into_iter().filter(|c| filter.matches(c)) {
        any = true;
        if let Some(s) = child.metrics.started {
            started = Some(started.map_or(s, |cur: DateTime<Utc>| cur.min(s)));
        }
        if let Some(c) = child.metrics.completed {
            completed = Some(completed.map_or(c, |cur: DateTime<Utc>| cur.max(c)));
        }
    }

    if !any {
        return FlowMetrics::default();
    }

    FlowMetrics {
        started,
        completed,
        cycle_time_days: match (started, completed) {
            (Some(s), Some(c)) => Some(days_between(s, c)),
            _ => None,
        },
    }
}

/// Evaluate one issue under `policy`. For a `Computed` policy the
/// caller supplies the epic's children with their metrics already
/// populated; a non-epic under a `Computed` policy gets no metrics.
#[must_use]
pub fn evaluate(issue: &Issue, policy: &CycleTimePolicy, children: &[&Issue]) -> FlowMetrics {
    match policy {
        CycleTimePolicy::Status {
            statuses,
            include_wait_time,
        } => evaluate_status(issue, statuses, *include_wait_time),
        CycleTimePolicy::Computed { child_filter } => {
            if issue.hierarchy_level == HierarchyLevel::Epic {
                evaluate_computed(children.iter().copied(), child_filter)
            } else {
                FlowMetrics::default()
            }
        }
    }
}

/// Recompute metrics for a whole issue set: stories under
/// `story_policy`, then epics under `epic_policy` over their freshly
/// annotated children (linked by `parent_key`).
pub fn apply_policies(
    issues: &mut [Issue],
    story_policy: &CycleTimePolicy,
    epic_policy: &CycleTimePolicy,
) {
    for issue in issues.iter_mut() {
        if issue.hierarchy_level == HierarchyLevel::Story {
            issue.metrics = evaluate(issue, story_policy, &[]);
        }
    }

    let mut children_of: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, issue) in issues.iter().enumerate() {
        if let Some(parent) = &issue.parent_key {
            children_of.entry(parent.clone()).or_default().push(index);
        }
    }

    let epic_metrics: Vec<(usize, FlowMetrics)> = issues
        .iter()
        .enumerate()
        .filter(|(_, issue)| issue.hierarchy_level == HierarchyLevel::Epic)
        .map(|(index, epic)| {
            let children: Vec<&Issue> = children_of
                .get(&epic.key)
                .map(|indices| indices.iter().map(|&i| &issues[i]).collect())
                .unwrap_or_default();
            (index, evaluate(epic, epic_policy, &children))
        })
        .collect();

    for (index, metrics) in epic_metrics {
        issues[index].metrics = metrics;
    }
}
