//! Default workflow inference.
//!
//! Trackers report statuses as an unordered vocabulary; a workflow wants
//! them in board order. The observed transition histories are the best
//! available signal: statuses are ranked by category (To Do < In Progress
//! < Done), then by their mean position across all issues' transition
//! sequences, then by name as the deterministic tie-break.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cadence_core::{Issue, Status, StatusCategory};

/// A named grouping of canonical statuses representing one stage of a
/// visual workflow. Stages marked `select_by_default` seed the default
/// cycle-time policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStage {
    pub name: String,
    pub select_by_default: bool,
    pub statuses: Vec<Status>,
}

/// Order canonical statuses into a displayed workflow order.
#[must_use]
pub fn order_statuses(statuses: &[Status], issues: &[Issue]) -> Vec<Status> {
    // Mean index of each status across observed transition sequences.
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for issue in issues {
        for (index, transition) in issue.transitions.iter().enumerate() {
            let entry = sums.entry(transition.to_status.name.as_str()).or_insert((0.0, 0));
            entry.0 += index as f64;
            entry.1 += 1;
        }
    }
    let mean_position = |status: &Status| {
        sums.get(status.name.as_str())
            .map_or(f64::INFINITY, |(sum, count)| sum / *count as f64)
    };

    let mut ordered = statuses.to_vec();
    ordered.sort_by(|a, b| {
        a.category
            .rank()
            .cmp(&b.category.rank())
            .then_with(|| mean_position(a).total_cmp(&mean_position(b)))
            .then_with(|| a.name.cmp(&b.name))
    });
    ordered
}

/// Group ordered statuses into one stage per category. The In Progress
/// stage is the default selection; empty stages are dropped.
#[must_use]
pub fn default_stages(statuses: &[Status], issues: &[Issue]) -> Vec<WorkflowStage> {
    let ordered = order_statuses(statuses, issues);

    [
        StatusCategory::ToDo,
        StatusCategory::InProgress,
        StatusCategory::Done,
    ]
    .into_iter()
    .filter_map(|category| {
        let members: Vec<Status> = ordered
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect();
        if members.is_empty() {
            return None;
        }
        Some(WorkflowStage {
            name: category.to_string(),
            select_by_default: category == StatusCategory::InProgress,
            statuses: members,
        })
    })
    .collect()
}
