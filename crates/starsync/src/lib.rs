//! Mirror your starred GitHub repositories into a Notion database.
//!
//! The library is organized around a small pipeline:
//!
//! - [`github::GithubClient`] fetches the viewer's starred repositories over
//!   GraphQL, either the whole list (cursor-paginated) or just the most
//!   recent few.
//! - [`cache::IdentityCache`] remembers which repositories already have a
//!   Notion page, keyed by `owner/name`, persisted as JSON on disk.
//! - [`notion::NotionClient`] queries the destination database and creates
//!   pages for whatever is missing.
//! - [`sync::SyncEngine`] ties the three together into `full` and
//!   `incremental` runs.
//!
//! Remote calls go through [`retry::with_retry`], which retries every
//! failure with bounded exponential backoff; rate limits and transient
//! outages are absorbed rather than classified.

pub mod cache;
pub mod github;
pub mod notion;
pub mod record;
pub mod retry;
pub mod sync;

pub use cache::{CACHE_NAMESPACE, CacheError, CacheStore, IdentityCache, JsonFileStore};
pub use record::{InventoryPage, PageInfo, RepositoryRecord, StarPage};
pub use sync::{
    ProgressCallback, RemoteError, SourceClient, SyncEngine, SyncError, SyncOptions, SyncProgress,
    SyncReport, TargetClient, WriteStats,
};
