//! Canonical data model: statuses, transitions, issues, and derived
//! flow metrics.

pub mod issue;
pub mod status;

pub use issue::{days_between, FlowMetrics, Issue, Transition};
pub use status::{HierarchyLevel, Status, StatusCategory};
