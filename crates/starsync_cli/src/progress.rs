//! Progress reporting via structured tracing output.

use std::sync::Arc;

use starsync::sync::{ProgressCallback, SyncProgress};

/// Callback routing engine progress events to tracing.
pub fn logging_callback() -> ProgressCallback {
    Arc::new(|event| match event {
        SyncProgress::FetchingStars { limit } => {
            tracing::info!(limit, "Fetching starred repositories");
        }

        SyncProgress::FetchedPage {
            page,
            count,
            total_so_far,
            has_more,
        } => {
            tracing::debug!(page, count, total_so_far, has_more, "Fetched page");
        }

        SyncProgress::FetchComplete { total } => {
            tracing::info!(total, "Fetch complete");
        }

        SyncProgress::HydratingInventory => {
            tracing::info!("Cache empty, scanning existing Notion pages");
        }

        SyncProgress::HydratedPage {
            count,
            total_so_far,
        } => {
            tracing::debug!(count, total_so_far, "Hydrated inventory page");
        }

        SyncProgress::HydrationComplete { total } => {
            tracing::info!(total, "Inventory scan complete");
        }

        SyncProgress::HydrationSkipped { cached } => {
            tracing::debug!(cached, "Cache already populated, skipping inventory scan");
        }

        SyncProgress::FullSyncSkipped { cached } => {
            tracing::warn!(
                cached,
                "Sync state already exists, refusing full sync; run `starsync incremental`"
            );
        }

        SyncProgress::WritingRecords {
            count,
            batch_size,
            dry_run,
        } => {
            tracing::info!(count, batch_size, dry_run, "Writing records to Notion");
        }

        SyncProgress::RecordCreated { key, record_id } => {
            tracing::info!(repo = %key, page = %record_id, "Created page");
        }

        SyncProgress::RecordSkipped { key } => {
            tracing::debug!(repo = %key, "Already synced");
        }

        SyncProgress::WriteError { key, error } => {
            tracing::warn!(repo = %key, error = %error, "Failed to create page");
        }

        SyncProgress::WriteComplete {
            created,
            skipped,
            errors,
        } => {
            tracing::info!(created, skipped, errors, "Write phase complete");
        }

        SyncProgress::RetryBackoff {
            label,
            retry_after_ms,
            attempt,
        } => {
            tracing::debug!(%label, retry_after_ms, attempt, "Backing off before retry");
        }

        _ => {}
    })
}
