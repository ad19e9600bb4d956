//! Error taxonomy for the metrics core.
//!
//! Integrity errors are fatal: they indicate the catalog or the fetched
//! change history is inconsistent, so the whole sync must be re-run.
//! Everything else (missing ids, stale policies, empty inputs) is
//! resolved locally and never surfaces as an error.

/// Fatal data-integrity failures raised during catalog construction and
/// issue building. These bubble to the caller unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The tracker reported a status-category label outside the fixed
    /// {To Do, In Progress, Done} enumeration.
    #[error("unrecognized status category label: {label:?}")]
    UnknownStatusCategory { label: String },

    /// A change-log entry references a status missing from the canonical
    /// catalog. The catalog was built from stale or incomplete status
    /// data; dropping the transition would corrupt the history.
    #[error("issue {issue_key}: transition references unknown status {status:?}")]
    UnknownTransitionStatus { issue_key: String, status: String },
}
