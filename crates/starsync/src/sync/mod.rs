//! The incremental sync engine.
//!
//! This module composes the rest of the crate into two operating modes:
//!
//! - [`engine::SyncEngine::full_sync`] - fetch the whole starred list and
//!   create every record the target is missing. Guarded: refuses to run when
//!   incremental state already exists.
//! - [`engine::SyncEngine::incremental_sync`] - fetch only the most recently
//!   starred repositories and create the ones the identity cache does not
//!   know about.
//!
//! The collaborator seams are the [`SourceClient`] and [`TargetClient`]
//! traits; production code plugs in [`crate::github::GithubClient`] and
//! [`crate::notion::NotionClient`], tests plug in mocks.

pub mod engine;
mod fetch;
mod progress;
mod types;
mod write;

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::CacheError;
use crate::record::{InventoryPage, RepositoryRecord, StarPage};

pub use engine::SyncEngine;
pub use fetch::{fetch_all_from_start, fetch_most_recent};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{
    BULK_FETCH_RETRY, DEFAULT_BATCH_SIZE, DEFAULT_FULL_SYNC_LIMIT, DEFAULT_PAGE_SIZE,
    DEFAULT_RECENT_COUNT, DEFAULT_TOPIC_LIMIT, INVENTORY_RETRY, MAX_RETRY_DELAY, SyncOptions,
    SyncReport, TAIL_FETCH_RETRY, WRITE_RETRY, WriteStats,
};
pub use write::create_missing;

/// Error from a remote collaborator, source or target.
///
/// The engine does not distinguish error classes for retry purposes; the
/// variants exist so diagnostics stay useful.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection-level failure (DNS, TLS, timeout, broken body).
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the remote service.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The remote answered but the payload violated the expected shape.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Run-level sync failure.
///
/// Write-path failures are deliberately absent: a record whose creation
/// exhausts retries is reported in [`WriteStats::errors`] and skipped, it
/// never fails the run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetching from the source exhausted retries. Fatal to the run; pages
    /// fetched before the failure are discarded.
    #[error("star fetch failed: {0}")]
    Fetch(#[source] RemoteError),

    /// The target inventory scan exhausted retries during hydration.
    #[error("target inventory scan failed: {0}")]
    Inventory(#[source] RemoteError),

    /// The durable cache store failed to load or flush.
    #[error("cache store error: {0}")]
    Cache(#[from] CacheError),
}

/// Read-only access to the source catalog's starred-repository list.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetch one page of starred repositories after `cursor` (`None` starts
    /// from the beginning), normalized into domain records.
    async fn starred_page(
        &self,
        cursor: Option<&str>,
        page_size: u32,
        topic_limit: u32,
    ) -> Result<StarPage, RemoteError>;

    /// Fetch only the `count` most recently starred repositories in one
    /// call, without cursor semantics.
    async fn starred_tail(
        &self,
        count: u32,
        topic_limit: u32,
    ) -> Result<Vec<RepositoryRecord>, RemoteError>;
}

/// Query and write access to the target record-keeping service.
#[async_trait]
pub trait TargetClient: Send + Sync {
    /// Fetch one page of the target's existing records for inventory
    /// hydration.
    async fn query_existing(&self, cursor: Option<&str>) -> Result<InventoryPage, RemoteError>;

    /// Create one record in the target, returning its assigned identifier.
    async fn create_record(&self, record: &RepositoryRecord) -> Result<String, RemoteError>;
}
