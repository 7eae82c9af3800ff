//! Progress reporting for sync runs.
//!
//! The engine emits [`SyncProgress`] events through an optional callback so
//! the CLI can log a human-readable trace without the library choosing an
//! output format.

use std::sync::Arc;

/// Progress events emitted during a sync run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Starting a full fetch of the starred list.
    FetchingStars {
        /// Maximum number of records that will be fetched.
        limit: usize,
    },

    /// Fetched one page of starred repositories.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Records on this page.
        count: usize,
        /// Running total of records fetched so far.
        total_so_far: usize,
        /// Whether the source reports further pages.
        has_more: bool,
    },

    /// Finished fetching from the source.
    FetchComplete {
        /// Total number of records fetched.
        total: usize,
    },

    /// Starting the full inventory scan of the target.
    HydratingInventory,

    /// Hydrated one page of existing target records.
    HydratedPage {
        /// Entries on this page.
        count: usize,
        /// Cache size after applying this page.
        total_so_far: usize,
    },

    /// Inventory scan complete.
    HydrationComplete {
        /// Cache size after the scan.
        total: usize,
    },

    /// Inventory scan skipped because the durable cache already had entries.
    HydrationSkipped {
        /// Number of cached entries that made the scan unnecessary.
        cached: usize,
    },

    /// Full sync refused because incremental state already exists.
    FullSyncSkipped {
        /// Number of cached entries that triggered the guard.
        cached: usize,
    },

    /// Starting to write missing records to the target.
    WritingRecords {
        /// Number of candidate records.
        count: usize,
        /// Concurrent creations per batch.
        batch_size: usize,
        /// Whether this is a dry run.
        dry_run: bool,
    },

    /// Created one target record.
    RecordCreated {
        /// Natural key of the record.
        key: String,
        /// Identifier assigned by the target.
        record_id: String,
    },

    /// Skipped a record already present in the identity cache.
    RecordSkipped {
        /// Natural key of the record.
        key: String,
    },

    /// A record's creation failed after exhausting retries.
    WriteError {
        /// Natural key of the record.
        key: String,
        /// Error message.
        error: String,
    },

    /// Write phase complete.
    WriteComplete {
        /// Records created.
        created: usize,
        /// Records skipped as already present.
        skipped: usize,
        /// Records that failed all retries.
        errors: usize,
    },

    /// A remote operation failed and is backing off before a retry.
    RetryBackoff {
        /// Short label for the operation being retried.
        label: String,
        /// Time to wait before the retry (ms).
        retry_after_ms: u64,
        /// Attempt number that just failed.
        attempt: u32,
    },
}

/// Callback for progress updates during sync operations. Shared so it can
/// follow record creations into their spawned tasks.
pub type ProgressCallback = Arc<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
