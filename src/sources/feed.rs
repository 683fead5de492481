//! Author syndication feed.
//!
//! Entries are normalized into [`ArticleRecord`]s as they are read: the title
//! gets ASCII apostrophes, the link loses its tracking query string, and a
//! missing publication date is replaced by the fetch time. RSS dates are kept
//! exactly as the feed wrote them.

use crate::models::ArticleRecord;
use crate::utils::local_timestamp;
use reqwest::Client;
use std::error::Error;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// The body was neither an RSS channel nor an Atom feed.
#[derive(Debug, Error)]
#[error("not an RSS or Atom document (rss: {rss}; atom: {atom})")]
pub struct FeedParseError {
    rss: rss::Error,
    atom: atom_syndication::Error,
}

/// Fetch the feed and return its entries as article records.
///
/// An unreachable feed, a non-success status and an unparsable body all
/// produce an empty list after logging a warning; callers cannot tell them
/// apart from a feed with no entries.
#[instrument(level = "info", skip(client))]
pub async fn fetch_feed(client: &Client, feed_url: &str) -> Vec<ArticleRecord> {
    match try_fetch_feed(client, feed_url).await {
        Ok(articles) => {
            info!(count = articles.len(), "Fetched feed entries");
            articles
        }
        Err(e) => {
            warn!(error = %e, "Feed fetch failed; continuing without feed entries");
            Vec::new()
        }
    }
}

async fn try_fetch_feed(
    client: &Client,
    feed_url: &str,
) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let body = client
        .get(feed_url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    debug!(bytes = body.len(), "Downloaded feed");
    Ok(parse_feed(&body)?)
}

/// Parse an RSS or Atom document into article records, in document order.
///
/// RSS is tried first, then Atom. Entries without a title or a link cannot
/// be matched or reported and are skipped.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<ArticleRecord>, FeedParseError> {
    let rss = match rss::Channel::read_from(bytes) {
        Ok(channel) => return Ok(rss_records(&channel)),
        Err(e) => e,
    };
    match atom_syndication::Feed::read_from(bytes) {
        Ok(feed) => Ok(atom_records(&feed)),
        Err(atom) => Err(FeedParseError { rss, atom }),
    }
}

fn rss_records(channel: &rss::Channel) -> Vec<ArticleRecord> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let Some(title) = item.title() else {
                let guid = item.guid().map(|g| g.value());
                debug!(?guid, "Skipping feed item without a title");
                return None;
            };
            let Some(link) = item.link() else {
                debug!(%title, "Skipping feed item without a link");
                return None;
            };
            let published = item
                .pub_date()
                .map(str::to_string)
                .unwrap_or_else(local_timestamp);
            Some(ArticleRecord::from_feed(title.trim(), link.trim(), published))
        })
        .collect()
}

fn atom_records(feed: &atom_syndication::Feed) -> Vec<ArticleRecord> {
    feed.entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().value.as_str();
            if title.trim().is_empty() {
                debug!(id = %entry.id(), "Skipping feed entry without a title");
                return None;
            }
            let links = entry.links();
            let Some(link) = links
                .iter()
                .find(|l| l.rel() == "alternate")
                .or_else(|| links.first())
            else {
                debug!(%title, "Skipping feed entry without a link");
                return None;
            };
            // Atom dates arrive pre-parsed; `updated` is mandatory.
            let published = entry.published().unwrap_or(entry.updated()).to_rfc3339();
            Some(ArticleRecord::from_feed(title.trim(), link.href().trim(), published))
        })
        .collect()
}
