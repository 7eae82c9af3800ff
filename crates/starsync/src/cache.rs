//! Durable identity cache mapping natural keys to target record ids.
//!
//! The cache is the engine's only persistent state. Each entry records that
//! a repository (keyed by `owner/name`) already has a page in the target, so
//! subsequent runs can skip it without querying the target again. Entries
//! are never evicted; a repository unstarred upstream simply stops being a
//! write candidate.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Namespace under which target page ids are stored.
pub const CACHE_NAMESPACE: &str = "notion-page";

/// Failure loading or flushing the durable cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable key-value storage for one or more cache namespaces.
///
/// Implementations are synchronous; the maps involved are small (one entry
/// per starred repository) and flushed from already-blocking call sites.
pub trait CacheStore: Send + Sync {
    /// Load every entry in `namespace`. A namespace never written before
    /// loads as an empty map, not an error.
    fn load(&self, namespace: &str) -> Result<HashMap<String, String>, CacheError>;

    /// Replace the durable contents of `namespace` with `entries`.
    /// Last write wins.
    fn save(&self, namespace: &str, entries: &HashMap<String, String>) -> Result<(), CacheError>;
}

/// File-backed [`CacheStore`] keeping one JSON object per namespace.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store namespaces as `<dir>/<namespace>.json`, creating `dir` lazily
    /// on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self, namespace: &str) -> Result<HashMap<String, String>, CacheError> {
        let path = self.namespace_path(namespace);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, namespace: &str, entries: &HashMap<String, String>) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(self.namespace_path(namespace), contents)?;
        Ok(())
    }
}

/// Default on-disk location for the cache, following platform conventions.
pub fn default_cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "starsync")
        .map(|dirs| dirs.state_dir().unwrap_or_else(|| dirs.data_dir()).to_path_buf())
}

/// In-memory view of one cache namespace, backed by a [`CacheStore`].
///
/// Mutations apply to the in-memory map immediately; [`persist`] flushes
/// the whole map to the store. Callers flush after each settled write batch
/// so an interrupted run loses at most the batch in flight.
///
/// [`persist`]: IdentityCache::persist
pub struct IdentityCache {
    entries: HashMap<String, String>,
    store: Box<dyn CacheStore>,
    namespace: String,
}

impl IdentityCache {
    /// Load the namespace's current durable contents into memory.
    pub fn load(store: Box<dyn CacheStore>, namespace: &str) -> Result<Self, CacheError> {
        let entries = store.load(namespace)?;
        Ok(Self {
            entries,
            store,
            namespace: namespace.to_string(),
        })
    }

    /// Whether `key` already has a target record id.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The target record id stored for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Record that `key` maps to `record_id`. Upserts: repeating a key
    /// overwrites its id.
    pub fn put(&mut self, key: &str, record_id: &str) {
        self.entries
            .insert(key.to_string(), record_id.to_string());
    }

    /// Flush the in-memory map to the durable store.
    pub fn persist(&self) -> Result<(), CacheError> {
        self.store.save(&self.namespace, &self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityCache")
            .field("namespace", &self.namespace)
            .field("entries", &self.entries.len())
            .finish()
    }
}
