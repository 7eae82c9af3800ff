//! Domain records exchanged between the source and target collaborators.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single starred repository, normalized from one source page edge.
///
/// Immutable once constructed. Records are transient: they flow from the
/// fetcher to the writer and are never persisted directly, only the
/// identity mapping they produce is.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRecord {
    /// Natural key, `owner/name`. Globally unique per source account,
    /// case-preserving.
    pub name_with_owner: String,
    /// Repository home page URL.
    pub url: String,
    /// Free-text description. Unbounded length at the source.
    pub description: Option<String>,
    /// Primary language name, if the source reports one.
    pub primary_language: Option<String>,
    /// When the repository was starred.
    pub starred_at: DateTime<Utc>,
    /// Last update timestamp at the source.
    pub updated_at: DateTime<Utc>,
    /// Stargazer count at fetch time.
    pub stargazer_count: u64,
    /// Topic names in source order, truncated to the configured limit.
    pub topics: Vec<String>,
}

/// Source-side pagination state: an opaque continuation token plus a
/// more-pages flag. Held only within one fetch loop invocation.
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    /// Cursor to resume after, opaque to this crate.
    pub end_cursor: Option<String>,
    /// Whether the source reports further pages.
    pub has_next_page: bool,
}

/// One page of normalized starred repositories.
#[derive(Debug, Clone)]
pub struct StarPage {
    /// Records on this page, in source order.
    pub records: Vec<RepositoryRecord>,
    /// Pagination state after this page.
    pub page_info: PageInfo,
}

/// One page of the target service's existing records, used to hydrate the
/// identity cache.
#[derive(Debug, Clone)]
pub struct InventoryPage {
    /// `(natural key, target record id)` pairs found on this page.
    pub entries: Vec<(String, String)>,
    /// Cursor for the next page, if any.
    pub next_cursor: Option<String>,
    /// Whether the target reports further pages.
    pub has_more: bool,
}
