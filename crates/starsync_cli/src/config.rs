//! Configuration file support for starsync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STARSYNC_`, e.g., `STARSYNC_GITHUB_TOKEN`)
//! 3. Config file (~/.config/starsync/config.toml or ./starsync.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use STARSYNC_GITHUB_TOKEN env var
//!
//! [notion]
//! token = "secret_..."      # or use STARSYNC_NOTION_TOKEN env var
//! database = "a1b2c3..."    # or use STARSYNC_NOTION_DATABASE env var
//!
//! [sync]
//! page_size = 100
//! topic_limit = 50
//! full_sync_limit = 2000
//! recent_count = 10
//! batch_size = 5
//!
//! [cache]
//! dir = "/var/lib/starsync"  # optional, defaults to the XDG state directory
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GithubConfig,
    /// Notion configuration.
    pub notion: NotionConfig,
    /// Default sync options.
    pub sync: SyncConfig,
    /// Identity cache storage.
    pub cache: CacheConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// GitHub API token. Decides whose starred repositories are synced.
    /// Can also be set via STARSYNC_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
}

/// Notion configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Notion integration token.
    /// Can also be set via STARSYNC_NOTION_TOKEN environment variable.
    pub token: Option<String>,
    /// Id of the destination database.
    /// Can also be set via STARSYNC_NOTION_DATABASE environment variable.
    pub database: Option<String>,
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Starred repositories requested per page.
    pub page_size: u32,
    /// Topics fetched per repository.
    pub topic_limit: u32,
    /// Cap on the number of records a full sync will fetch.
    pub full_sync_limit: usize,
    /// Tail-window size for incremental runs.
    pub recent_count: u32,
    /// Concurrent page creations per batch.
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: starsync::sync::DEFAULT_PAGE_SIZE,
            topic_limit: starsync::sync::DEFAULT_TOPIC_LIMIT,
            full_sync_limit: starsync::sync::DEFAULT_FULL_SYNC_LIMIT,
            recent_count: starsync::sync::DEFAULT_RECENT_COUNT,
            batch_size: starsync::sync::DEFAULT_BATCH_SIZE,
        }
    }
}

/// Identity cache storage.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the cache files.
    /// Defaults to the platform state directory (~/.local/state/starsync).
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/starsync/config.toml)
    /// 3. Local config file (./starsync.toml)
    /// 4. Environment variables with STARSYNC_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "starsync") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("starsync.toml");
        if local_config.exists() {
            tracing::debug!("loading config from ./starsync.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g. STARSYNC_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("STARSYNC")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Directory for the identity cache, falling back to the platform state
    /// directory.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache
            .dir
            .clone()
            .or_else(starsync::cache::default_cache_dir)
    }
}
