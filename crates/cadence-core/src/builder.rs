//! Issue builder: turns one raw tracker record plus the status catalog
//! into an [`Issue`] with an ordered, gap-free transition history.
//!
//! The builder takes the sync's "now" as an explicit parameter instead of
//! reading an ambient clock, so replays and tests are deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::StatusCatalog;
use crate::error::CoreError;
use crate::model::{days_between, FlowMetrics, HierarchyLevel, Issue, Status, StatusCategory, Transition};

/// Tracker fields the builder consumes. The ingestion collaborator
/// fetches exactly this set.
pub const REQUIRED_FIELDS: &[&str] = &[
    "summary",
    "issuetype",
    "status",
    "labels",
    "components",
    "created",
    "parent",
];

/// One status-field change from a raw tracker change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStatusChange {
    pub date: DateTime<Utc>,
    /// Status name before the change; `None` on trackers that omit the
    /// origin of the very first change.
    pub from_status: Option<String>,
    pub to_status: String,
}

/// A work item as fetched from the tracker, before canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIssue {
    pub key: String,
    pub summary: String,
    pub issue_type: String,
    /// Current status name.
    pub status: String,
    pub created: DateTime<Utc>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub parent_key: Option<String>,
    pub changelog: Vec<RawStatusChange>,
}

/// Builds [`Issue`]s against one catalog, one URL template, and one
/// explicit "now".
#[derive(Debug, Clone)]
pub struct IssueBuilder<'a> {
    catalog: &'a StatusCatalog,
    url_template: String,
    now: DateTime<Utc>,
}

impl<'a> IssueBuilder<'a> {
    /// `url_template` must contain a `{key}` placeholder, e.g.
    /// `https://tracker.example.com/browse/{key}`.
    #[must_use]
    pub fn new(catalog: &'a StatusCatalog, url_template: &str, now: DateTime<Utc>) -> Self {
        Self {
            catalog,
            url_template: url_template.to_string(),
            now,
        }
    }

    /// The tracker field set this builder needs, for the ingestion side.
    #[must_use]
    pub const fn required_fields() -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    /// Build one issue from its raw record.
    ///
    /// The change log is walked in chronological order, each from/to
    /// status name mapped through the catalog. A synthetic
    /// `Created -> first observed status` transition is prepended when
    /// the real history does not start at the creation timestamp. The
    /// final transition stays open (`until = now`) unless the item is in
    /// a Done-category status.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownTransitionStatus`] when the change log
    /// (or the current status) references a status absent from the
    /// catalog. That means the catalog was built from stale status data,
    /// and the whole sync must fail rather than silently drop history.
    pub fn build(&self, raw: &RawIssue) -> Result<Issue, CoreError> {
        let current = self.resolve(&raw.key, &raw.status)?.clone();

        let mut changes = raw.changelog.clone();
        changes.sort_by_key(|c| c.date);

        // (from, to, entered-at) triples; untils are assigned once the
        // full sequence is known.
        let mut spans: Vec<(Option<Status>, Status, DateTime<Utc>)> = Vec::new();
        for change in &changes {
            let from = match change.from_status.as_deref() {
                Some(name) => Some(self.resolve(&raw.key, name)?.clone()),
                None => None,
            };
            let to = self.resolve(&raw.key, &change.to_status)?.clone();
            spans.push((from, to, change.date));
        }

        let lead = match spans.first() {
            // No observed changes: the item has been in its current
            // status since creation.
            None => Some(current.clone()),
            Some((Some(initial), _, first_date)) if *first_date > raw.created => {
                Some(initial.clone())
            }
            Some(_) => None,
        };
        if let Some(first_status) = lead {
            spans.insert(0, (None, first_status, raw.created));
        }

        let last_observed = spans.last().map_or(raw.created, |(_, _, date)| *date);
        let closes_at = if current.category == StatusCategory::Done {
            last_observed
        } else {
            self.now
        };

        let mut transitions = Vec::with_capacity(spans.len());
        for i in 0..spans.len() {
            let until = spans.get(i + 1).map_or(closes_at, |(_, _, date)| *date);
            let (from_status, to_status, date) = spans[i].clone();
            transitions.push(Transition {
                from_status,
                to_status,
                date,
                until,
                time_in_status_days: days_between(date, until),
            });
        }

        Ok(Issue {
            key: raw.key.clone(),
            summary: raw.summary.clone(),
            issue_type: raw.issue_type.clone(),
            hierarchy_level: HierarchyLevel::from_issue_type(&raw.issue_type),
            status_category: current.category,
            status: current,
            created: raw.created,
            labels: raw.labels.clone(),
            components: raw.components.clone(),
            parent_key: raw.parent_key.clone(),
            url: self.url_template.replace("{key}", &raw.key),
            transitions,
            metrics: FlowMetrics::default(),
        })
    }

    fn resolve(&self, issue_key: &str, name: &str) -> Result<&Status, CoreError> {
        self.catalog
            .get(name)
            .ok_or_else(|| CoreError::UnknownTransitionStatus {
                issue_key: issue_key.to_string(),
                status: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::catalog::RawStatus;

    fn catalog() -> StatusCatalog {
        let raw: Vec<RawStatus> = [
            ("1", "Backlog", "To Do"),
            ("2", "In Progress", "In Progress"),
            ("3", "In Review", "In Progress"),
            ("4", "Done", "Done"),
        ]
        .into_iter()
        .map(|(id, name, category)| RawStatus {
            id: Some(id.to_string()),
            name: name.to_string(),
            category: category.to_string(),
        })
        .collect();
        StatusCatalog::build(&raw).expect("catalog builds")
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn change(d: u32, from: &str, to: &str) -> RawStatusChange {
        RawStatusChange {
            date: day(d),
            from_status: Some(from.to_string()),
            to_status: to.to_string(),
        }
    }

    fn raw_issue(status: &str, changelog: Vec<RawStatusChange>) -> RawIssue {
        RawIssue {
            key: "CAD-7".to_string(),
            summary: "build pipeline".to_string(),
            issue_type: "Story".to_string(),
            status: status.to_string(),
            created: day(1),
            labels: vec!["infra".to_string()],
            components: vec![],
            parent_key: Some("CAD-1".to_string()),
            changelog,
        }
    }

    #[test]
    fn synthesizes_leading_created_transition() {
        let catalog = catalog();
        let builder = IssueBuilder::new(&catalog, "https://t.example.com/browse/{key}", day(20));

        let issue = builder
            .build(&raw_issue(
                "In Progress",
                vec![change(3, "Backlog", "In Progress")],
            ))
            .expect("builds");

        assert_eq!(issue.transitions.len(), 2);
        let first = &issue.transitions[0];
        assert_eq!(first.from_status, None);
        assert_eq!(first.to_status.name, "Backlog");
        assert_eq!(first.date, day(1));
        assert_eq!(first.until, day(3));
        // Open issue: final transition runs to "now".
        assert_eq!(issue.transitions[1].until, day(20));
        assert_eq!(issue.url, "https://t.example.com/browse/CAD-7");
    }

    #[test]
    fn transitions_form_a_gap_free_chain() {
        let catalog = catalog();
        let builder = IssueBuilder::new(&catalog, "{key}", day(20));

        let issue = builder
            .build(&raw_issue(
                "Done",
                vec![
                    change(3, "Backlog", "In Progress"),
                    change(5, "In Progress", "In Review"),
                    change(8, "In Review", "Done"),
                ],
            ))
            .expect("builds");

        for pair in issue.transitions.windows(2) {
            assert_eq!(pair[1].from_status.as_ref(), Some(&pair[0].to_status));
            assert_eq!(pair[0].until, pair[1].date);
            assert!(pair[0].date <= pair[1].date);
        }
    }

    #[test]
    fn done_issue_final_until_stays_at_last_change() {
        let catalog = catalog();
        let builder = IssueBuilder::new(&catalog, "{key}", day(20));

        let issue = builder
            .build(&raw_issue(
                "Done",
                vec![
                    change(3, "Backlog", "In Progress"),
                    change(8, "In Progress", "Done"),
                ],
            ))
            .expect("builds");

        let last = issue.transitions.last().expect("non-empty");
        assert_eq!(last.until, day(8));
        assert!((last.time_in_status_days).abs() < 1e-9);
    }

    #[test]
    fn no_changelog_yields_single_span_from_creation() {
        let catalog = catalog();
        let builder = IssueBuilder::new(&catalog, "{key}", day(20));

        let issue = builder.build(&raw_issue("Backlog", vec![])).expect("builds");

        assert_eq!(issue.transitions.len(), 1);
        assert_eq!(issue.transitions[0].to_status.name, "Backlog");
        assert_eq!(issue.transitions[0].date, day(1));
        assert_eq!(issue.transitions[0].until, day(20));
    }

    #[test]
    fn out_of_order_changelog_is_sorted() {
        let catalog = catalog();
        let builder = IssueBuilder::new(&catalog, "{key}", day(20));

        let issue = builder
            .build(&raw_issue(
                "Done",
                vec![
                    change(8, "In Progress", "Done"),
                    change(3, "Backlog", "In Progress"),
                ],
            ))
            .expect("builds");

        let dates: Vec<_> = issue.transitions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![day(1), day(3), day(8)]);
    }

    #[test]
    fn unknown_status_fails_the_build() {
        let catalog = catalog();
        let builder = IssueBuilder::new(&catalog, "{key}", day(20));

        let err = builder
            .build(&raw_issue(
                "In Progress",
                vec![change(3, "Backlog", "Blocked")],
            ))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::UnknownTransitionStatus {
                issue_key: "CAD-7".to_string(),
                status: "Blocked".to_string(),
            }
        );
    }

    #[test]
    fn raw_issue_parses_from_tracker_json() {
        let json = r#"{
            "key": "CAD-9",
            "summary": "wire the exporter",
            "issue_type": "Task",
            "status": "Backlog",
            "created": "2024-03-01T09:00:00Z",
            "labels": ["infra"],
            "components": [],
            "parent_key": null,
            "changelog": [
                {
                    "date": "2024-03-02T14:30:00Z",
                    "from_status": "Backlog",
                    "to_status": "In Progress"
                }
            ]
        }"#;
        let raw: RawIssue = serde_json::from_str(json).expect("parses");
        assert_eq!(raw.key, "CAD-9");
        assert_eq!(raw.changelog.len(), 1);
        assert_eq!(raw.changelog[0].to_status, "In Progress");
    }

    #[test]
    fn epic_hierarchy_level_from_type() {
        let catalog = catalog();
        let builder = IssueBuilder::new(&catalog, "{key}", day(20));

        let mut raw = raw_issue("Backlog", vec![]);
        raw.issue_type = "Epic".to_string();
        let issue = builder.build(&raw).expect("builds");
        assert_eq!(issue.hierarchy_level, HierarchyLevel::Epic);
    }
}
