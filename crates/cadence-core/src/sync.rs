//! Tracker ingestion boundary.
//!
//! The core never talks to the network itself: a [`TrackerClient`]
//! implementation supplies raw status records and issue records, and the
//! driver here assembles the canonical dataset. Bulk detail fetches run
//! in fixed-size key chunks with bounded concurrency to respect tracker
//! rate limits; a failed chunk fails the whole sync. Cancellation, if
//! offered, is the client's concern.

use chrono::{DateTime, Utc};

use crate::builder::{IssueBuilder, RawIssue};
use crate::catalog::{RawStatus, StatusCatalog};
use crate::model::Issue;

/// Keys per detail-fetch request.
pub const CHUNK_SIZE: usize = 100;
/// Chunk requests in flight at once.
pub const MAX_IN_FLIGHT: usize = 5;

/// Supplies raw tracker data. Implementations own pagination,
/// authentication, and retries.
pub trait TrackerClient {
    /// All status records the tracker knows, across every project the
    /// dataset touches. The catalog must be complete before any issue is
    /// built.
    fn canonical_statuses(&self) -> anyhow::Result<Vec<RawStatus>>;

    /// Fetch full records (with change logs) for the given keys,
    /// restricted to the given field set.
    fn fetch_issue_records(&self, keys: &[String], fields: &[&str]) -> anyhow::Result<Vec<RawIssue>>;
}

/// A freshly synced dataset: the canonical catalog plus every issue,
/// rebuilt wholesale. Nothing here is patched incrementally.
#[derive(Debug, Clone)]
pub struct SyncedDataset {
    pub catalog: StatusCatalog,
    pub issues: Vec<Issue>,
}

/// Rebuild a dataset from scratch through `client`.
///
/// Fetches the status vocabulary, builds the catalog, then pulls issue
/// records for `keys` in chunks of [`CHUNK_SIZE`] with at most
/// [`MAX_IN_FLIGHT`] chunks in flight. Any chunk failure, catalog error,
/// or unknown-status transition aborts the sync.
///
/// # Errors
///
/// Client errors and [`crate::error::CoreError`] integrity failures are
/// propagated unmodified.
pub fn sync_dataset<C: TrackerClient + Sync>(
    client: &C,
    keys: &[String],
    url_template: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<SyncedDataset> {
    let catalog = StatusCatalog::build(&client.canonical_statuses()?)?;
    let builder = IssueBuilder::new(&catalog, url_template, now);

    let raw = fetch_chunked(client, keys)?;
    tracing::debug!(issues = raw.len(), statuses = catalog.len(), "sync fetch complete");

    let issues = raw
        .iter()
        .map(|record| builder.build(record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SyncedDataset { catalog, issues })
}

/// Fetch issue records in bounded-concurrency waves of key chunks.
fn fetch_chunked<C: TrackerClient + Sync>(
    client: &C,
    keys: &[String],
) -> anyhow::Result<Vec<RawIssue>> {
    let chunks: Vec<&[String]> = keys.chunks(CHUNK_SIZE).collect();
    let mut records = Vec::with_capacity(keys.len());

    for wave in chunks.chunks(MAX_IN_FLIGHT) {
        let results: Vec<anyhow::Result<Vec<RawIssue>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = wave
                .iter()
                .map(|chunk| {
                    scope.spawn(move || {
                        client.fetch_issue_records(chunk, crate::builder::REQUIRED_FIELDS)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("issue fetch worker panicked")),
                })
                .collect()
        });

        for result in results {
            records.extend(result?);
        }
    }

    Ok(records)
}
