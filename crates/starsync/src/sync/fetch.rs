//! Cursor-paginated and tail-window fetching from the source catalog.

use crate::record::{PageInfo, RepositoryRecord, StarPage};
use crate::retry::with_retry;

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{BULK_FETCH_RETRY, TAIL_FETCH_RETRY};
use super::{RemoteError, SourceClient};

/// Fetch the full starred list from an empty cursor, page by page.
///
/// Pages are requested strictly sequentially: page N+1 is never requested
/// before page N's cursor is known. Stops when the source reports no further
/// pages or the accumulated count reaches `max_total`; a final page that
/// overshoots the cap is fetched whole and the result truncated, so exactly
/// `max_total` records are returned.
///
/// Returns the ordered records plus the final page-position metadata. An
/// exhausted retry on any page fails the whole fetch; records from earlier
/// pages are discarded by the caller.
pub async fn fetch_all_from_start<S>(
    source: &S,
    page_size: u32,
    topic_limit: u32,
    max_total: usize,
    on_progress: Option<&ProgressCallback>,
) -> Result<(Vec<RepositoryRecord>, PageInfo), RemoteError>
where
    S: SourceClient + ?Sized,
{
    emit(on_progress, SyncProgress::FetchingStars { limit: max_total });

    let mut records: Vec<RepositoryRecord> = Vec::new();
    if max_total == 0 {
        emit(on_progress, SyncProgress::FetchComplete { total: 0 });
        return Ok((records, PageInfo::default()));
    }

    let mut cursor: Option<String> = None;
    let mut page = 1u32;

    loop {
        let star_page = with_retry(
            || source.starred_page(cursor.as_deref(), page_size, topic_limit),
            BULK_FETCH_RETRY,
            "starred page fetch",
            on_progress,
        )
        .await?;

        let StarPage {
            records: mut page_records,
            page_info,
        } = star_page;
        let count = page_records.len();
        records.append(&mut page_records);

        tracing::debug!(
            page,
            count,
            total = records.len(),
            has_more = page_info.has_next_page,
            cursor = ?page_info.end_cursor,
            "fetched starred page"
        );
        emit(
            on_progress,
            SyncProgress::FetchedPage {
                page,
                count,
                total_so_far: records.len(),
                has_more: page_info.has_next_page,
            },
        );

        if records.len() >= max_total {
            records.truncate(max_total);
            emit(
                on_progress,
                SyncProgress::FetchComplete {
                    total: records.len(),
                },
            );
            return Ok((records, page_info));
        }

        if !page_info.has_next_page {
            emit(
                on_progress,
                SyncProgress::FetchComplete {
                    total: records.len(),
                },
            );
            return Ok((records, page_info));
        }

        match page_info.end_cursor.clone() {
            Some(next) => cursor = Some(next),
            None => {
                // A source claiming more pages without a cursor can't be
                // paged further; treat what we have as the complete list.
                tracing::warn!("source reported more pages without a cursor, stopping");
                emit(
                    on_progress,
                    SyncProgress::FetchComplete {
                        total: records.len(),
                    },
                );
                return Ok((records, page_info));
            }
        }
        page += 1;
    }
}

/// Fetch only the `count` most recently starred repositories.
///
/// A single tail-window call, no page looping. Used by incremental runs
/// where the identity cache, not pagination state, decides what is new.
pub async fn fetch_most_recent<S>(
    source: &S,
    count: u32,
    topic_limit: u32,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<RepositoryRecord>, RemoteError>
where
    S: SourceClient + ?Sized,
{
    let records = with_retry(
        || source.starred_tail(count, topic_limit),
        TAIL_FETCH_RETRY,
        "starred tail fetch",
        on_progress,
    )
    .await?;

    tracing::debug!(count = records.len(), requested = count, "fetched tail window");
    emit(
        on_progress,
        SyncProgress::FetchComplete {
            total: records.len(),
        },
    );

    Ok(records)
}
