//! Starsync CLI - mirror starred GitHub repositories into Notion.

mod config;
mod progress;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use starsync::cache::{CACHE_NAMESPACE, IdentityCache, JsonFileStore};
use starsync::github::GithubClient;
use starsync::notion::NotionClient;
use starsync::sync::{SyncEngine, SyncOptions, SyncReport};

#[derive(Parser)]
#[command(name = "starsync")]
#[command(version)]
#[command(about = "Mirror your starred GitHub repositories into a Notion database")]
#[command(after_long_help = r#"CONFIGURATION
    Starsync reads configuration from:
      1. ~/.config/starsync/config.toml (or $XDG_CONFIG_HOME/starsync/config.toml)
      2. ./starsync.toml
      3. Environment variables (STARSYNC_* prefix)

ENVIRONMENT VARIABLES
    STARSYNC_GITHUB_TOKEN      GitHub personal access token (decides whose stars are synced)
    STARSYNC_NOTION_TOKEN      Notion integration token
    STARSYNC_NOTION_DATABASE   Id of the destination Notion database

EXAMPLES
    First run, copy everything:
        $ starsync full

    Steady state (e.g. from cron):
        $ starsync incremental

    See what an incremental run would create:
        $ starsync incremental --dry-run
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the whole starred list into Notion (first run only)
    ///
    /// Refuses to run when sync state already exists; use `incremental`
    /// for subsequent runs.
    Full {
        /// Maximum number of repositories to fetch (default from config or 2000)
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        opts: CommonOptions,
    },
    /// Sync only the most recently starred repositories
    Incremental {
        /// How many of the most recent stars to check (default from config or 10)
        #[arg(short, long)]
        recent: Option<u32>,

        #[command(flatten)]
        opts: CommonOptions,
    },
}

/// Options shared by both sync modes.
#[derive(Debug, Clone, clap::Args)]
struct CommonOptions {
    /// Concurrent Notion page creations per batch (default from config or 5)
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Dry run - show what would be created without writing to Notion
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("starsync=info,starsync_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = config::Config::load();
    let cli = Cli::parse();

    let github_token = config
        .github
        .token
        .clone()
        .ok_or("GitHub token not configured (set STARSYNC_GITHUB_TOKEN)")?;
    let notion_token = config
        .notion
        .token
        .clone()
        .ok_or("Notion token not configured (set STARSYNC_NOTION_TOKEN)")?;
    let database_id = config
        .notion
        .database
        .clone()
        .ok_or("Notion database id not configured (set STARSYNC_NOTION_DATABASE)")?;
    let cache_dir = config
        .cache_dir()
        .ok_or("could not determine a cache directory")?;

    let source = GithubClient::new(github_token);
    let target = NotionClient::new(notion_token, database_id);
    let cache = IdentityCache::load(Box::new(JsonFileStore::new(cache_dir)), CACHE_NAMESPACE)?;

    let mut options = SyncOptions {
        page_size: config.sync.page_size,
        topic_limit: config.sync.topic_limit,
        full_sync_limit: config.sync.full_sync_limit,
        recent_count: config.sync.recent_count,
        batch_size: config.sync.batch_size,
        dry_run: false,
    };

    let report = match cli.command {
        Commands::Full { limit, opts } => {
            if let Some(limit) = limit {
                options.full_sync_limit = limit;
            }
            apply_common(&mut options, &opts);

            let mut engine = SyncEngine::new(source, target, cache, options);
            engine.full_sync(Some(&progress::logging_callback())).await?
        }
        Commands::Incremental { recent, opts } => {
            if let Some(recent) = recent {
                options.recent_count = recent;
            }
            apply_common(&mut options, &opts);

            let mut engine = SyncEngine::new(source, target, cache, options);
            engine
                .incremental_sync(Some(&progress::logging_callback()))
                .await?
        }
    };

    // Per-record write failures degrade the run but do not fail it; only
    // fetch-stage errors (the Err path above) exit non-zero.
    summarize(&report);
    Ok(())
}

fn apply_common(options: &mut SyncOptions, opts: &CommonOptions) {
    if let Some(batch_size) = opts.batch_size {
        options.batch_size = batch_size;
    }
    options.dry_run = opts.dry_run;
}

fn summarize(report: &SyncReport) {
    if report.guarded_skip {
        return;
    }
    tracing::info!(
        fetched = report.fetched,
        created = report.stats.created,
        skipped = report.stats.skipped,
        errors = report.stats.errors.len(),
        "sync complete"
    );
    for error in &report.stats.errors {
        tracing::error!("failed to sync: {}", error);
    }
}
