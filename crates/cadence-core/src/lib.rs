#![forbid(unsafe_code)]
//! cadence-core: canonical data model and tracker ingestion boundary.
//!
//! Everything downstream of ingestion is a pure, synchronous
//! transformation over fully materialized in-memory collections: the
//! [`catalog::StatusCatalog`] canonicalizes the tracker's status
//! vocabulary, the [`builder::IssueBuilder`] reconstructs each item's
//! status history, and [`sync::sync_dataset`] drives the chunked fetch
//! through a [`sync::TrackerClient`].
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums ([`error::CoreError`]) for integrity
//!   failures; `anyhow::Result` at the ingestion boundary.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`,
//!   `trace!`). Skipped records warn; integrity failures error out.

pub mod builder;
pub mod catalog;
pub mod error;
pub mod model;
pub mod sync;

pub use builder::{IssueBuilder, RawIssue, RawStatusChange};
pub use catalog::{RawStatus, StatusCatalog};
pub use error::CoreError;
pub use model::{
    days_between, FlowMetrics, HierarchyLevel, Issue, Status, StatusCategory, Transition,
};
pub use sync::{sync_dataset, SyncedDataset, TrackerClient};
