//! Orchestration of full and incremental sync runs.

use crate::cache::IdentityCache;
use crate::retry::with_retry;

use super::fetch::{fetch_all_from_start, fetch_most_recent};
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{INVENTORY_RETRY, SyncOptions, SyncReport};
use super::write::create_missing;
use super::{SourceClient, SyncError, TargetClient};

/// Drives a sync run end to end: hydrate the identity cache, fetch from the
/// source, create what the target is missing.
///
/// Generic over its collaborators so tests can substitute mocks for the
/// GitHub and Notion clients.
pub struct SyncEngine<S, T> {
    source: S,
    target: T,
    cache: IdentityCache,
    options: SyncOptions,
}

impl<S, T> SyncEngine<S, T>
where
    S: SourceClient,
    T: TargetClient + Clone + 'static,
{
    pub fn new(source: S, target: T, cache: IdentityCache, options: SyncOptions) -> Self {
        Self {
            source,
            target,
            cache,
            options,
        }
    }

    /// The engine's identity cache, mainly for post-run inspection.
    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Fill an empty identity cache from the target's existing records.
    ///
    /// Pages through the target's full inventory and stores each record's
    /// natural key and id. Recovers the dedup state after cache loss without
    /// re-creating anything. A cache with any entries at all is trusted
    /// as-is and the scan is skipped.
    pub async fn hydrate_if_empty(
        &mut self,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<(), SyncError> {
        if !self.cache.is_empty() {
            tracing::debug!(cached = self.cache.len(), "cache populated, skipping hydration");
            emit(
                on_progress,
                SyncProgress::HydrationSkipped {
                    cached: self.cache.len(),
                },
            );
            return Ok(());
        }

        tracing::info!("cache empty, hydrating from target inventory");
        emit(on_progress, SyncProgress::HydratingInventory);

        let mut cursor: Option<String> = None;
        loop {
            let page = with_retry(
                || self.target.query_existing(cursor.as_deref()),
                INVENTORY_RETRY,
                "inventory query",
                on_progress,
            )
            .await
            .map_err(SyncError::Inventory)?;

            let count = page.entries.len();
            for (key, record_id) in &page.entries {
                self.cache.put(key, record_id);
            }
            emit(
                on_progress,
                SyncProgress::HydratedPage {
                    count,
                    total_so_far: self.cache.len(),
                },
            );

            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    tracing::warn!("target reported more inventory without a cursor, stopping");
                    break;
                }
            }
        }

        self.cache.persist()?;
        tracing::info!(total = self.cache.len(), "hydration complete");
        emit(
            on_progress,
            SyncProgress::HydrationComplete {
                total: self.cache.len(),
            },
        );
        Ok(())
    }

    /// Fetch the whole starred list and create every record the target is
    /// missing.
    ///
    /// Guarded: when the durable cache already has entries, the run is
    /// refused and [`SyncReport::guarded_skip`] is set. Incremental runs
    /// are the cheap steady-state path; a full sync over an already-synced
    /// account would page through the entire list to create nothing.
    pub async fn full_sync(
        &mut self,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<SyncReport, SyncError> {
        if !self.cache.is_empty() {
            tracing::info!(
                cached = self.cache.len(),
                "sync state already exists, refusing full sync; run incremental instead"
            );
            emit(
                on_progress,
                SyncProgress::FullSyncSkipped {
                    cached: self.cache.len(),
                },
            );
            return Ok(SyncReport {
                guarded_skip: true,
                ..SyncReport::default()
            });
        }

        self.hydrate_if_empty(on_progress).await?;

        let (records, last_page) = fetch_all_from_start(
            &self.source,
            self.options.page_size,
            self.options.topic_limit,
            self.options.full_sync_limit,
            on_progress,
        )
        .await
        .map_err(SyncError::Fetch)?;
        tracing::info!(
            fetched = records.len(),
            has_more = last_page.has_next_page,
            cursor = ?last_page.end_cursor,
            "star fetch complete"
        );

        let stats = create_missing(
            &self.target,
            &records,
            &mut self.cache,
            self.options.batch_size,
            self.options.dry_run,
            on_progress,
        )
        .await;

        Ok(SyncReport {
            fetched: records.len(),
            stats,
            guarded_skip: false,
        })
    }

    /// Fetch only the most recently starred repositories and create the
    /// ones the identity cache does not know about.
    pub async fn incremental_sync(
        &mut self,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<SyncReport, SyncError> {
        self.hydrate_if_empty(on_progress).await?;

        let records = fetch_most_recent(
            &self.source,
            self.options.recent_count,
            self.options.topic_limit,
            on_progress,
        )
        .await
        .map_err(SyncError::Fetch)?;

        let stats = create_missing(
            &self.target,
            &records,
            &mut self.cache,
            self.options.batch_size,
            self.options.dry_run,
            on_progress,
        )
        .await;

        Ok(SyncReport {
            fetched: records.len(),
            stats,
            guarded_skip: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::cache::{CacheError, CacheStore};
    use crate::record::{InventoryPage, PageInfo, RepositoryRecord, StarPage};
    use crate::sync::RemoteError;

    use super::*;

    #[derive(Clone, Default)]
    struct MemoryStore {
        saved: Arc<Mutex<HashMap<String, HashMap<String, String>>>>,
    }

    impl CacheStore for MemoryStore {
        fn load(&self, namespace: &str) -> Result<HashMap<String, String>, CacheError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .get(namespace)
                .cloned()
                .unwrap_or_default())
        }

        fn save(
            &self,
            namespace: &str,
            entries: &HashMap<String, String>,
        ) -> Result<(), CacheError> {
            self.saved
                .lock()
                .unwrap()
                .insert(namespace.to_string(), entries.clone());
            Ok(())
        }
    }

    fn record(key: &str) -> RepositoryRecord {
        RepositoryRecord {
            name_with_owner: key.to_string(),
            url: format!("https://github.com/{key}"),
            description: None,
            primary_language: None,
            starred_at: Utc::now(),
            updated_at: Utc::now(),
            stargazer_count: 0,
            topics: Vec::new(),
        }
    }

    /// Source serving one fixed list as a single page and as the tail.
    #[derive(Clone)]
    struct StubSource {
        records: Vec<RepositoryRecord>,
        page_requests: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn new(keys: &[&str]) -> Self {
            Self {
                records: keys.iter().map(|k| record(k)).collect(),
                page_requests: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl SourceClient for StubSource {
        async fn starred_page(
            &self,
            _cursor: Option<&str>,
            _page_size: u32,
            _topic_limit: u32,
        ) -> Result<StarPage, RemoteError> {
            self.page_requests.fetch_add(1, Ordering::SeqCst);
            Ok(StarPage {
                records: self.records.clone(),
                page_info: PageInfo::default(),
            })
        }

        async fn starred_tail(
            &self,
            count: u32,
            _topic_limit: u32,
        ) -> Result<Vec<RepositoryRecord>, RemoteError> {
            let skip = self.records.len().saturating_sub(count as usize);
            Ok(self.records.iter().skip(skip).cloned().collect())
        }
    }

    /// Target with a preloaded inventory, recording every create.
    #[derive(Clone, Default)]
    struct StubTarget {
        inventory: Vec<(String, String)>,
        created: Arc<Mutex<Vec<String>>>,
        inventory_queries: Arc<AtomicUsize>,
    }

    impl StubTarget {
        fn with_inventory(entries: &[(&str, &str)]) -> Self {
            Self {
                inventory: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                ..Self::default()
            }
        }

        fn created_keys(&self) -> Vec<String> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TargetClient for StubTarget {
        async fn query_existing(
            &self,
            cursor: Option<&str>,
        ) -> Result<InventoryPage, RemoteError> {
            self.inventory_queries.fetch_add(1, Ordering::SeqCst);
            // Serve the inventory one entry per page to exercise paging.
            let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let entries = self
                .inventory
                .get(index)
                .cloned()
                .map(|e| vec![e])
                .unwrap_or_default();
            let has_more = index + 1 < self.inventory.len();
            Ok(InventoryPage {
                entries,
                next_cursor: has_more.then(|| (index + 1).to_string()),
                has_more,
            })
        }

        async fn create_record(&self, record: &RepositoryRecord) -> Result<String, RemoteError> {
            let mut created = self.created.lock().unwrap();
            created.push(record.name_with_owner.clone());
            Ok(format!("page-{}", created.len()))
        }
    }

    fn empty_cache() -> IdentityCache {
        IdentityCache::load(Box::new(MemoryStore::default()), "test").unwrap()
    }

    fn cache_with(entries: &[(&str, &str)]) -> IdentityCache {
        let mut cache = empty_cache();
        for (key, id) in entries {
            cache.put(key, id);
        }
        cache
    }

    #[tokio::test]
    async fn full_sync_on_fresh_state_creates_everything() {
        let source = StubSource::new(&["a/x", "a/y", "a/z"]);
        let target = StubTarget::default();
        let mut engine = SyncEngine::new(
            source,
            target.clone(),
            empty_cache(),
            SyncOptions::default(),
        );

        let report = engine.full_sync(None).await.unwrap();

        assert!(!report.guarded_skip);
        assert_eq!(report.fetched, 3);
        assert_eq!(report.stats.created, 3);
        assert_eq!(target.created_keys(), ["a/x", "a/y", "a/z"]);
        assert_eq!(engine.cache().len(), 3);
    }

    #[tokio::test]
    async fn full_sync_refuses_when_state_exists() {
        let source = StubSource::new(&["a/x"]);
        let target = StubTarget::default();
        let page_requests = Arc::clone(&source.page_requests);
        let mut engine = SyncEngine::new(
            source,
            target.clone(),
            cache_with(&[("a/x", "page-1")]),
            SyncOptions::default(),
        );

        let report = engine.full_sync(None).await.unwrap();

        assert!(report.guarded_skip);
        assert_eq!(report.fetched, 0);
        assert_eq!(report.stats.created, 0);
        // Neither the source nor the target was touched.
        assert_eq!(page_requests.load(Ordering::SeqCst), 0);
        assert!(target.created_keys().is_empty());
    }

    #[tokio::test]
    async fn hydration_pages_through_the_full_inventory() {
        let target =
            StubTarget::with_inventory(&[("a/x", "page-1"), ("a/y", "page-2"), ("a/z", "page-3")]);
        let mut engine = SyncEngine::new(
            StubSource::new(&[]),
            target.clone(),
            empty_cache(),
            SyncOptions::default(),
        );

        engine.hydrate_if_empty(None).await.unwrap();

        assert_eq!(engine.cache().len(), 3);
        assert_eq!(engine.cache().get("a/y"), Some("page-2"));
        assert_eq!(target.inventory_queries.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn hydration_is_skipped_when_cache_is_populated() {
        let target = StubTarget::with_inventory(&[("a/x", "page-1")]);
        let mut engine = SyncEngine::new(
            StubSource::new(&[]),
            target.clone(),
            cache_with(&[("b/y", "page-9")]),
            SyncOptions::default(),
        );

        engine.hydrate_if_empty(None).await.unwrap();

        assert_eq!(engine.cache().len(), 1);
        assert_eq!(target.inventory_queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn incremental_sync_creates_only_uncached_records() {
        let source = StubSource::new(&["a/x", "a/w"]);
        let target = StubTarget::default();
        let mut engine = SyncEngine::new(
            source,
            target.clone(),
            cache_with(&[("a/x", "page-1")]),
            SyncOptions::default(),
        );

        let report = engine.incremental_sync(None).await.unwrap();

        assert_eq!(report.fetched, 2);
        assert_eq!(report.stats.created, 1);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(target.created_keys(), ["a/w"]);
        assert!(engine.cache().contains("a/w"));
    }

    #[tokio::test]
    async fn incremental_sync_hydrates_an_empty_cache_first() {
        let source = StubSource::new(&["a/x", "a/w"]);
        let target = StubTarget::with_inventory(&[("a/x", "page-1")]);
        let mut engine = SyncEngine::new(
            source,
            target.clone(),
            empty_cache(),
            SyncOptions::default(),
        );

        let report = engine.incremental_sync(None).await.unwrap();

        // a/x came back from the inventory scan, so only a/w is created.
        assert_eq!(report.stats.created, 1);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(target.created_keys(), ["a/w"]);
    }
}
