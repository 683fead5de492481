//! One reconciliation run: load, fetch, reconcile, persist, report.
//!
//! Store failures abort the run. Source failures do not: a run where the
//! feed or every archive page failed still completes, usually reporting no
//! new articles.

use crate::config::RunConfig;
use crate::models::ArticleRecord;
use crate::reconcile::reconcile;
use crate::sources::archive::{ArchiveScraper, ListingOutcome};
use crate::sources::feed::fetch_feed;
use crate::store;
use crate::utils::local_timestamp;
use reqwest::Client;
use std::error::Error;
use std::io::Write;
use tracing::{info, instrument, warn};

/// What a run found and did.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Articles not seen before, in feed order.
    pub new_articles: Vec<ArticleRecord>,
    /// Entries read from the feed.
    pub feed_entries: usize,
    /// Entries scraped across all archive pages.
    pub web_entries: usize,
    /// Archive pages that could not be fetched.
    pub failed_listings: usize,
    /// Whether the store was rewritten.
    pub persisted: bool,
}

/// Execute a single run, writing operator-facing progress lines to `out`.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written, if the configured
/// site or heading selector is invalid, or if writing to `out` fails.
#[instrument(level = "info", skip_all, fields(store = %config.store_path.display()))]
pub async fn run<W: Write>(
    config: &RunConfig,
    client: &Client,
    out: &mut W,
) -> Result<RunReport, Box<dyn Error>> {
    writeln!(out, "Fetching RSS feed at {}...", local_timestamp())?;

    let scraper = ArchiveScraper::new(config.site_url()?, &config.heading_selector)?;

    let mut stored = store::load(&config.store_path).await?;
    let fetched = fetch_feed(client, &config.feed_url).await;
    let feed_entries = fetched.len();

    let mut web = Vec::new();
    let mut failed_listings = 0;
    for page_url in &config.listing_urls {
        let outcome = scraper.fetch_listing(client, page_url).await;
        if let ListingOutcome::Failed(e) = &outcome {
            failed_listings += 1;
            writeln!(out, "Failed to fetch listing page: {e}")?;
        }
        web.extend(outcome.into_articles());
    }
    let web_entries = web.len();
    info!(feed_entries, web_entries, failed_listings, "Sources fetched");

    let new_articles = reconcile(&stored, fetched, &web);
    let mut report = RunReport {
        new_articles: Vec::new(),
        feed_entries,
        web_entries,
        failed_listings,
        persisted: false,
    };

    if new_articles.is_empty() {
        writeln!(out, "No new articles found.")?;
        info!("No new articles");
        return Ok(report);
    }

    writeln!(out, "Found {} new articles!", new_articles.len())?;
    if config.dry_run {
        warn!(count = new_articles.len(), "Dry run; store left untouched");
    } else {
        stored.extend(new_articles.iter().cloned());
        store::save(&config.store_path, &stored).await?;
        report.persisted = true;
    }

    for article in &new_articles {
        writeln!(out, "New Article: {} - {}", article.title, article.link)?;
    }
    info!(count = new_articles.len(), total = stored.len(), "Run complete");

    report.new_articles = new_articles;
    Ok(report)
}
