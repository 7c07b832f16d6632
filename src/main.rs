//! # Tech News Digest
//!
//! A daily pipeline that collects technology headlines from news APIs,
//! renders them as portrait story cards, and hands the digest to a
//! note-taking platform.
//!
//! ## Features
//!
//! - Queries NewsAPI, GNews and TianXing in priority order, stopping once
//!   enough unique headlines are collected
//! - Caches the merged result for an hour and falls back to a built-in
//!   list when every source comes back empty
//! - Categorizes headlines by keyword and ranks them by hot score
//! - Renders three 1080×1920 SVG cards
//! - Posts the note to a webhook, or saves it locally with an import guide
//!
//! ## Usage
//!
//! ```sh
//! tech_news_digest --send --config ./config.yaml
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Cache check, then ranked sources, merge, score, sort
//! 2. **Rendering**: Cover, detail and summary cards
//! 3. **Delivery**: Webhook or local save (skipped without `--send`)
//! 4. **Reporting**: JSON run report in the output directory

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cache;
mod categorize;
mod cli;
mod config;
mod delivery;
mod error;
mod fallback;
mod models;
mod outputs;
mod pipeline;
mod schedule;
mod sources;
mod utils;

use aggregator::NewsAggregator;
use cache::{FileCache, MemoryCache, NewsCache};
use cli::Cli;
use config::AppConfig;
use delivery::NoteSender;
use pipeline::Pipeline;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, send = args.send, test = args.test, "Parsed CLI arguments");

    if args.setup_cron {
        let exe = std::env::current_exe()?;
        let workdir = std::env::current_dir()?;
        print!("{}", schedule::cron_guide(&workdir, &exe));
        return Ok(());
    }

    info!("tech_news_digest starting up");

    // ---- Configuration ----
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_cli(&args);

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    // ---- Wiring ----
    let source_client = sources::http_client(Duration::from_secs(config.request_timeout_secs))?;
    let sources = sources::from_config(&config, &source_client);
    let configured = sources.iter().filter(|s| s.is_configured()).count();
    info!(configured, total = sources.len(), "News sources ready");

    let cache: Box<dyn NewsCache> = if args.no_cache {
        info!("Using in-memory cache for this run");
        Box::new(MemoryCache::new())
    } else {
        let file_cache = FileCache::new(&config.cache.path);
        info!(path = %file_cache.path().display(), "Using file cache");
        Box::new(file_cache)
    };

    let mut aggregator = NewsAggregator::new(sources, cache, config.fallback_dataset())
        .with_cache_duration(config.cache.duration_secs);
    if let Some(seed) = config.score_seed {
        aggregator = aggregator.with_seed(seed);
    }

    let delivery_client = sources::http_client(Duration::from_secs(config.delivery_timeout_secs))?;
    let sender = NoteSender::new(delivery_client, &config.delivery, &config.output_dir);

    // ---- Run ----
    let mut pipeline = Pipeline::new(aggregator, sender, &config.output_dir, config.count);
    let report = pipeline.run(args.skip_send()).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        success = report.success,
        "Execution complete"
    );

    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}
