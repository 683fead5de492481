//! Data models for articles seen in the feed, on the archive site and in the store.
//!
//! - [`ArticleRecord`]: the canonical record, persisted to the JSON store
//! - [`WebArticle`]: a title/link pair scraped from an archive listing page
//!
//! Titles are the identity of an article across sources, so both the feed
//! adapter and the store agree on [`normalize_title`] before comparing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The right single quotation mark the feed uses in place of `'`.
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';

/// One blog article as persisted in the store.
///
/// Records read back from disk keep any keys this crate does not know about
/// in [`ArticleRecord::extra`], so rewriting the store never loses data that
/// another tool put there.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Normalized title; the deduplication key.
    pub title: String,
    /// Canonical link with the query string removed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    /// Publication timestamp as reported by the feed, or the fetch time.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub published: String,
    /// Matching article on the archive site, attached during enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    /// Unrecognized keys, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArticleRecord {
    /// Build a record from raw feed values, applying title and link normalization.
    pub fn from_feed(title: &str, link: &str, published: String) -> Self {
        Self {
            title: normalize_title(title),
            link: strip_query(link).to_string(),
            published,
            ..Default::default()
        }
    }
}

/// An article listed on the archive website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebArticle {
    pub title: String,
    pub link: String,
}

/// Replace typographic apostrophes with ASCII ones.
pub fn normalize_title(title: &str) -> String {
    title.replace(RIGHT_SINGLE_QUOTE, "'")
}

/// Drop everything from the first `?` onward.
pub fn strip_query(link: &str) -> &str {
    match link.split_once('?') {
        Some((base, _)) => base,
        None => link,
    }
}
