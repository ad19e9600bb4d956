#![forbid(unsafe_code)]
//! cadence-metrics: workflow analytics over issue histories.
//!
//! Every operation here is a pure, synchronous function over fully
//! materialized issue collections: no shared mutable state, no locking,
//! safe to call in parallel across independent datasets.
//!
//! - [`policy`] / [`workflow`]: cycle-time policies, validity checking,
//!   and default-workflow inference.
//! - [`cycle_time`]: annotates issues with started/completed/cycle-time
//!   metrics under a policy.
//! - [`wip`]: per-day work-in-progress series (LeadTime or Status
//!   counting).
//! - [`throughput`]: bucketed completion counts with percentile markers.
//! - [`stats`]: linear-interpolation quantiles and Tukey-fence outlier
//!   detection.
//!
//! # Conventions
//!
//! - **Errors**: integrity failures come from `cadence-core`; everything
//!   in this crate resolves degenerate inputs to empty results instead
//!   of erroring.
//! - **Logging**: `tracing` macros; stale-policy rebuilds warn.

pub mod cycle_time;
pub mod policy;
pub mod stats;
pub mod throughput;
pub mod wip;
pub mod workflow;

pub use cycle_time::{apply_policies, evaluate, evaluate_computed, evaluate_status};
pub use policy::{default_policy, ensure_valid, ChildFilter, CycleTimePolicy, FilterMode};
pub use stats::{
    cycle_time_percentiles, exclude_outliers, outliers, percentiles, quantile,
    summary_percentiles, throughput_percentiles, tukey_fence, Percentile, TukeyFence,
};
pub use throughput::{throughput, BucketWidth, ThroughputDatum, ThroughputResult};
pub use wip::{wip, DateRange, WipAlgorithm, WipDatum};
pub use workflow::{default_stages, order_statuses, WorkflowStage};
