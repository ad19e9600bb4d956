use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The three canonical status categories every tracker status maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    ToDo,
    InProgress,
    Done,
}

impl StatusCategory {
    const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Rank used when ordering statuses into a default workflow.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::ToDo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Map a tracker's own status-category label onto the fixed enumeration.
    ///
    /// Both display names ("To Do") and API keys ("new", "indeterminate",
    /// "done") are accepted, case-insensitively. An unrecognized label is a
    /// data error surfaced to the caller, never silently defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownStatusCategory`] for any other label.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        match label.to_ascii_lowercase().as_str() {
            "to do" | "todo" | "new" | "open" => Ok(Self::ToDo),
            "in progress" | "indeterminate" => Ok(Self::InProgress),
            "done" | "complete" => Ok(Self::Done),
            _ => Err(CoreError::UnknownStatusCategory {
                label: label.to_string(),
            }),
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical, deduplicated tracker status.
///
/// One `Status` exists per distinct status *name* in a dataset; the
/// tracker-side id of the first record observed for that name is kept as
/// `external_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// Id of the status record on the tracker side.
    pub external_id: String,
    /// Display name, the deduplication key.
    pub name: String,
    /// Canonical category.
    pub category: StatusCategory,
}

impl Status {
    #[must_use]
    pub fn new(external_id: &str, name: &str, category: StatusCategory) -> Self {
        Self {
            external_id: external_id.to_string(),
            name: name.to_string(),
            category,
        }
    }
}

/// Story/Epic classification of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyLevel {
    Story,
    Epic,
}

impl HierarchyLevel {
    /// Classify a raw tracker issue-type name.
    ///
    /// Anything that is not an epic sits at story level: stories, tasks,
    /// bugs and other leaf types all flow through the same policies.
    #[must_use]
    pub fn from_issue_type(issue_type: &str) -> Self {
        if issue_type.eq_ignore_ascii_case("epic") {
            Self::Epic
        } else {
            Self::Story
        }
    }
}
