//! Shared sync types, defaults, and retry policies.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Default number of starred repositories requested per source page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default number of topics fetched per repository.
pub const DEFAULT_TOPIC_LIMIT: u32 = 50;

/// Default cap on the number of records a full sync will fetch.
pub const DEFAULT_FULL_SYNC_LIMIT: usize = 2000;

/// Default tail-window size for incremental runs.
pub const DEFAULT_RECENT_COUNT: u32 = 10;

/// Default number of concurrent record creations per batch.
/// Kept small to respect the target service's write rate limits.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Hard cap on any single backoff delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(3600);

/// Retry policy for bulk page fetches. Full syncs are rare and can afford
/// to wait out long source-side rate limit windows.
pub const BULK_FETCH_RETRY: RetryPolicy = RetryPolicy::new(6, 2.0, Duration::from_secs(120));

/// Retry policy for tail-window fetches. Incremental runs are
/// time-sensitive and give up sooner.
pub const TAIL_FETCH_RETRY: RetryPolicy = RetryPolicy::new(4, 2.0, Duration::from_secs(5));

/// Retry policy for target inventory queries during hydration.
pub const INVENTORY_RETRY: RetryPolicy = RetryPolicy::new(6, 2.0, Duration::from_secs(5));

/// Retry policy for record creations. Write endpoints are more rate-limited
/// than reads, hence the longer minimum delay.
pub const WRITE_RETRY: RetryPolicy = RetryPolicy::new(6, 2.0, Duration::from_secs(10));

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Records requested per source page.
    pub page_size: u32,
    /// Topics fetched per repository.
    pub topic_limit: u32,
    /// Cap on the number of records a full sync will fetch.
    pub full_sync_limit: usize,
    /// Tail-window size for incremental runs.
    pub recent_count: u32,
    /// Concurrent record creations per batch.
    pub batch_size: usize,
    /// Dry run mode - report what would be created without writing.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            topic_limit: DEFAULT_TOPIC_LIMIT,
            full_sync_limit: DEFAULT_FULL_SYNC_LIMIT,
            recent_count: DEFAULT_RECENT_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
        }
    }
}

/// Outcome of the write phase.
#[derive(Debug, Default)]
pub struct WriteStats {
    /// Records created in the target.
    pub created: usize,
    /// Records skipped because the identity cache already knew them.
    pub skipped: usize,
    /// Per-record failures that exhausted retries (non-fatal).
    pub errors: Vec<String>,
}

/// Summary of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Records fetched from the source.
    pub fetched: usize,
    /// Write-phase outcome.
    pub stats: WriteStats,
    /// True when a full sync was refused because the cache was non-empty.
    pub guarded_skip: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_options_defaults_match_constants() {
        let options = SyncOptions::default();

        assert_eq!(options.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(options.topic_limit, DEFAULT_TOPIC_LIMIT);
        assert_eq!(options.full_sync_limit, DEFAULT_FULL_SYNC_LIMIT);
        assert_eq!(options.recent_count, DEFAULT_RECENT_COUNT);
        assert_eq!(options.batch_size, DEFAULT_BATCH_SIZE);
        assert!(!options.dry_run);
    }

    #[test]
    fn write_stats_default_is_empty() {
        let stats = WriteStats::default();
        assert_eq!(stats.created, 0);
        assert_eq!(stats.skipped, 0);
        assert!(stats.errors.is_empty());
    }

    #[test]
    fn write_policies_back_off_longer_than_read_policies() {
        assert!(WRITE_RETRY.min_delay > INVENTORY_RETRY.min_delay);
        assert!(BULK_FETCH_RETRY.min_delay > TAIL_FETCH_RETRY.min_delay);
    }
}
