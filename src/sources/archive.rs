//! Archive website listing scraper.
//!
//! The archive site lists every published article on paginated index pages.
//! Each entry is a heading (by default `<h6 class="title is-6">`) wrapping a
//! single anchor whose text is the article title:
//!
//! ```html
//! <h6 class="title is-6">
//!   <a class="link" href="/go-memory-model/">Understanding Go's Memory Model</a>
//! </h6>
//! ```
//!
//! Hrefs are relative and are resolved against the configured site URL.

use crate::models::WebArticle;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why a listing page produced no articles.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

/// Result of scraping one listing page.
#[derive(Debug)]
pub enum ListingOutcome {
    /// The page was fetched and contained at least one article.
    Found(Vec<WebArticle>),
    /// The page was fetched but no entries matched.
    Empty,
    /// The page could not be fetched.
    Failed(ListingError),
}

impl ListingOutcome {
    /// The scraped articles, treating failure as an empty page.
    pub fn into_articles(self) -> Vec<WebArticle> {
        match self {
            ListingOutcome::Found(articles) => articles,
            ListingOutcome::Empty | ListingOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Scrapes archive listing pages for a single site.
#[derive(Debug, Clone)]
pub struct ArchiveScraper {
    site: Url,
    heading: Selector,
    anchor: Selector,
}

impl ArchiveScraper {
    /// Build a scraper resolving hrefs against `site` and matching entries
    /// with `heading_selector`.
    pub fn new(site: Url, heading_selector: &str) -> Result<Self, ListingError> {
        Ok(Self {
            site,
            heading: parse_selector(heading_selector)?,
            anchor: parse_selector("a")?,
        })
    }

    /// Fetch one listing page. Never fails; problems are reported through
    /// [`ListingOutcome::Failed`].
    #[instrument(level = "info", skip(self, client))]
    pub async fn fetch_listing(&self, client: &Client, page_url: &str) -> ListingOutcome {
        let response = match client.get(page_url).send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(error = %source, "Listing request failed");
                return ListingOutcome::Failed(ListingError::Request {
                    url: page_url.to_string(),
                    source,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let preview = response.text().await.unwrap_or_default();
            warn!(
                %status,
                body = %truncate_for_log(&preview, 200),
                "Listing page returned non-success status"
            );
            return ListingOutcome::Failed(ListingError::Status {
                url: page_url.to_string(),
                status,
            });
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(source) => {
                warn!(error = %source, "Failed reading listing body");
                return ListingOutcome::Failed(ListingError::Request {
                    url: page_url.to_string(),
                    source,
                });
            }
        };

        let articles = self.parse_listing(&html);
        info!(count = articles.len(), "Scraped archive listing");
        if articles.is_empty() {
            ListingOutcome::Empty
        } else {
            ListingOutcome::Found(articles)
        }
    }

    /// Extract title/link pairs from a listing page, in document order.
    ///
    /// Headings without an anchor, anchors without an `href`, and hrefs that
    /// cannot be resolved against the site are skipped.
    pub fn parse_listing(&self, html: &str) -> Vec<WebArticle> {
        let document = Html::parse_document(html);

        let mut articles = Vec::new();
        for heading in document.select(&self.heading) {
            let Some(anchor) = heading.select(&self.anchor).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let link = match self.site.join(href) {
                Ok(link) => link.to_string(),
                Err(e) => {
                    debug!(%href, error = %e, "Skipping unresolvable archive href");
                    continue;
                }
            };
            let title = anchor.text().collect::<String>().trim().to_string();
            articles.push(WebArticle { title, link });
        }
        debug!(articles = ?articles, "Archive entries");
        articles
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ListingError> {
    Selector::parse(selector).map_err(|e| ListingError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
