//! Canonical status catalog.
//!
//! Trackers expose an open-ended status vocabulary; the catalog
//! canonicalizes it once per sync into deduplicated [`Status`] entries
//! keyed by name. The catalog is immutable after construction and is
//! passed explicitly to the issue builder, so concurrent syncs of
//! different datasets never share lookup state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Status, StatusCategory};

/// A status record as the tracker reports it, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatus {
    /// Tracker-side id. Records without one are skipped with a warning.
    pub id: Option<String>,
    pub name: String,
    /// The tracker's own status-category label.
    pub category: String,
}

/// Deduplicated canonical statuses for one dataset, with a precomputed
/// name lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCatalog {
    by_name: HashMap<String, Status>,
    // First-observed order of names, for stable iteration.
    order: Vec<String>,
}

impl StatusCatalog {
    /// Canonicalize a batch of raw tracker status records.
    ///
    /// One entry is kept per distinct name; when the tracker reports
    /// inconsistent categories for the same name across records, the
    /// first observed category wins. A record with a missing id is
    /// dropped with a warning rather than aborting the batch.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownStatusCategory`] when a record carries
    /// a category label outside the fixed enumeration.
    pub fn build(raw: &[RawStatus]) -> Result<Self, CoreError> {
        let mut catalog = Self::default();

        for record in raw {
            let Some(id) = record.id.as_deref() else {
                tracing::warn!(status = %record.name, "skipping status record with no id");
                continue;
            };
            let category = StatusCategory::parse(&record.category)?;
            catalog.insert(Status::new(id, &record.name, category));
        }

        Ok(catalog)
    }

    fn insert(&mut self, status: Status) {
        if self.by_name.contains_key(&status.name) {
            return;
        }
        self.order.push(status.name.clone());
        self.by_name.insert(status.name.clone(), status);
    }

    /// Look up a canonical status by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Status> {
        self.by_name.get(name)
    }

    /// Canonical statuses in first-observed order.
    pub fn statuses(&self) -> impl Iterator<Item = &Status> {
        self.order.iter().filter_map(|name| self.by_name.get(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
