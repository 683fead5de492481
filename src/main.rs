//! # postwatch
//!
//! Detects newly published blog articles by reconciling three sources:
//! a local JSON record of articles already seen, the author's syndication
//! feed, and the article listing on a companion archive website.
//!
//! ## Usage
//!
//! ```sh
//! postwatch --store-path ../blog/draft/articles.json
//! ```
//!
//! ## Architecture
//!
//! Each invocation is a single sequential run:
//! 1. **Load**: read the stored articles (an absent store means first run)
//! 2. **Fetch**: read the feed, then scrape each archive listing page
//! 3. **Reconcile**: attach archive links by title, keep unseen titles
//! 4. **Persist**: append new articles and rewrite the store, if any were found
//!
//! Scheduling repeated runs is left to cron, systemd timers or similar.

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod models;
mod reconcile;
mod run;
mod sources;
mod store;
mod utils;

use cli::Cli;
use config::RunConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("postwatch starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match RunConfig::resolve(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let mut stdout = std::io::stdout().lock();
    let report = match run::run(&config, &client, &mut stdout).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Run aborted");
            return Err(e);
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        feed_entries = report.feed_entries,
        web_entries = report.web_entries,
        new_articles = report.new_articles.len(),
        persisted = report.persisted,
        failed_listings = report.failed_listings,
        "Execution complete"
    );

    Ok(())
}
