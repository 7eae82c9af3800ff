//! Concurrency-bounded batch writing to the target service.

use crate::cache::IdentityCache;
use crate::record::RepositoryRecord;
use crate::retry::with_retry;

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{WRITE_RETRY, WriteStats};
use super::TargetClient;

/// Create every record the target is missing, in fixed-size batches.
///
/// Within a batch, creations run concurrently; batches are processed
/// strictly sequentially, so peak in-flight writes never exceed
/// `batch_size`. The identity cache is re-checked as each batch is built,
/// guarding against duplicate scheduling within the same run. A successful
/// creation is recorded in the cache and flushed to durable storage before
/// its counters are updated, so a completed write is never silently
/// un-recorded.
///
/// A record whose creation exhausts retries is reported and skipped; its
/// siblings and later batches still run. One unsynced star is preferable to
/// an aborted run.
pub async fn create_missing<T>(
    target: &T,
    records: &[RepositoryRecord],
    cache: &mut IdentityCache,
    batch_size: usize,
    dry_run: bool,
    on_progress: Option<&ProgressCallback>,
) -> WriteStats
where
    T: TargetClient + Clone + 'static,
{
    let mut stats = WriteStats::default();
    if records.is_empty() {
        return stats;
    }

    let batch_size = batch_size.max(1);
    emit(
        on_progress,
        SyncProgress::WritingRecords {
            count: records.len(),
            batch_size,
            dry_run,
        },
    );

    for batch in records.chunks(batch_size) {
        let mut handles = Vec::with_capacity(batch.len());

        for record in batch {
            let key = record.name_with_owner.clone();
            if cache.contains(&key) {
                stats.skipped += 1;
                emit(on_progress, SyncProgress::RecordSkipped { key });
                continue;
            }

            if dry_run {
                tracing::info!(%key, "dry-run: would create record");
                stats.created += 1;
                continue;
            }

            let client = target.clone();
            let record = record.clone();
            let progress = on_progress.cloned();
            handles.push(tokio::spawn(async move {
                let result = with_retry(
                    || client.create_record(&record),
                    WRITE_RETRY,
                    "record create",
                    progress.as_ref(),
                )
                .await;
                (record.name_with_owner.clone(), result)
            }));
        }

        // Settle the whole batch before starting the next one.
        for handle in handles {
            match handle.await {
                Ok((key, Ok(record_id))) => {
                    cache.put(&key, &record_id);
                    if let Err(e) = cache.persist() {
                        tracing::warn!(%key, error = %e, "cache flush failed after create");
                    }
                    tracing::info!(%key, %record_id, "created target record");
                    stats.created += 1;
                    emit(on_progress, SyncProgress::RecordCreated { key, record_id });
                }
                Ok((key, Err(e))) => {
                    let error = e.to_string();
                    tracing::warn!(%key, %error, "record create failed after retries, skipping");
                    stats.errors.push(format!("{key}: {error}"));
                    emit(on_progress, SyncProgress::WriteError { key, error });
                }
                Err(e) => {
                    stats.errors.push(format!("task panic: {e}"));
                }
            }
        }
    }

    emit(
        on_progress,
        SyncProgress::WriteComplete {
            created: stats.created,
            skipped: stats.skipped,
            errors: stats.errors.len(),
        },
    );

    stats
}
