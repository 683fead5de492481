//! Cross-source reconciliation of article records.
//!
//! The feed and the archive site expose different URL shapes for the same
//! article, so records are matched by their normalized title. Two distinct
//! articles sharing an identical title are treated as one.

use crate::models::{ArticleRecord, WebArticle};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Enrich `fetched` with archive links and return the records whose titles
/// are not yet in `stored`, in `fetched` order.
///
/// Enrichment is applied to every fetched record before filtering.
#[instrument(
    level = "info",
    skip_all,
    fields(stored = stored.len(), fetched = fetched.len(), web = web.len())
)]
pub fn reconcile(
    stored: &[ArticleRecord],
    mut fetched: Vec<ArticleRecord>,
    web: &[WebArticle],
) -> Vec<ArticleRecord> {
    let enriched = enrich(&mut fetched, web);
    let new_articles = find_new(stored, fetched);
    debug!(enriched, new = new_articles.len(), "Reconciled feed against store");
    new_articles
}

/// Attach `web_link` to each fetched record whose title appears in `web`.
///
/// When several web entries share a title the first one wins. Records with no
/// match are left as they are. Returns the number of records enriched.
pub fn enrich(fetched: &mut [ArticleRecord], web: &[WebArticle]) -> usize {
    let mut links: HashMap<&str, &str> = HashMap::with_capacity(web.len());
    for article in web {
        links.entry(article.title.as_str()).or_insert(article.link.as_str());
    }

    let mut enriched = 0;
    for record in fetched.iter_mut() {
        if let Some(link) = links.get(record.title.as_str()) {
            record.web_link = Some((*link).to_string());
            enriched += 1;
        }
    }
    enriched
}

/// Keep the fetched records whose title does not appear in `stored`.
pub fn find_new(stored: &[ArticleRecord], fetched: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let stored_titles: HashSet<&str> = stored.iter().map(|a| a.title.as_str()).collect();
    fetched
        .into_iter()
        .filter(|record| !stored_titles.contains(record.title.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn fetched(title: &str, link: &str) -> ArticleRecord {
        ArticleRecord::from_feed(title, link, "Mon, 01 Jul 2024 10:00:00 +0000".to_string())
    }

    fn web(title: &str, link: &str) -> WebArticle {
        WebArticle {
            title: title.to_string(),
            link: link.to_string(),
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let stored_articles = vec![stored("A")];
        let fetched_articles = vec![fetched("A", "https://x/a?x=1"), fetched("B", "https://x/b")];
        let web_articles = vec![web("B", "https://y/b")];

        let new_articles = reconcile(&stored_articles, fetched_articles, &web_articles);

        assert_eq!(new_articles.len(), 1);
        assert_eq!(new_articles[0].title, "B");
        assert_eq!(new_articles[0].link, "https://x/b");
        assert_eq!(new_articles[0].web_link.as_deref(), Some("https://y/b"));
        assert_eq!(stored_articles, vec![stored("A")]);
    }

    #[test]
    fn test_second_pass_finds_nothing() {
        let mut stored_articles = vec![stored("A")];
        let fetched_articles = vec![
            fetched("A", "https://x/a"),
            fetched("B", "https://x/b"),
            fetched("C", "https://x/c"),
        ];

        let first = reconcile(&stored_articles, fetched_articles.clone(), &[]);
        assert_eq!(first.len(), 2);

        stored_articles.extend(first);
        let second = reconcile(&stored_articles, fetched_articles, &[]);
        assert!(second.is_empty());
    }

    #[test]
    fn test_title_identity_ignores_link_and_published() {
        let mut known = fetched("Same Title", "https://old/link");
        known.published = "2020-01-01 00:00:00.000000".to_string();

        let new_articles =
            reconcile(&[known], vec![fetched("Same Title", "https://new/link")], &[]);
        assert!(new_articles.is_empty());
    }

    #[test]
    fn test_normalized_title_matches_stored_ascii() {
        let new_articles = reconcile(
            &[stored("Go's Scheduler")],
            vec![fetched("Go\u{2019}s Scheduler", "https://x/s")],
            &[],
        );
        assert!(new_articles.is_empty());
    }

    #[test]
    fn test_enrichment_applies_to_known_articles() {
        let mut records = vec![fetched("A", "https://x/a"), fetched("B", "https://x/b")];
        let count = enrich(&mut records, &[web("A", "https://y/a")]);

        assert_eq!(count, 1);
        assert_eq!(records[0].web_link.as_deref(), Some("https://y/a"));
        assert!(records[1].web_link.is_none());

        // "A" is known, so only the unenriched "B" comes back.
        let new_articles = find_new(&[stored("A")], records);
        assert_eq!(new_articles.len(), 1);
        assert!(new_articles[0].web_link.is_none());
    }

    #[test]
    fn test_first_web_match_wins() {
        let mut records = vec![fetched("A", "https://x/a")];
        enrich(
            &mut records,
            &[web("A", "https://y/first"), web("A", "https://y/second")],
        );
        assert_eq!(records[0].web_link.as_deref(), Some("https://y/first"));
    }

    #[test]
    fn test_web_match_is_exact() {
        let mut records = vec![fetched("Title", "https://x/t")];
        let count = enrich(
            &mut records,
            &[web("title", "https://y/t"), web("Title ", "https://y/t2")],
        );

        assert_eq!(count, 0);
        assert!(records[0].web_link.is_none());
    }

    #[test]
    fn test_order_preserved() {
        let fetched_articles = vec![
            fetched("C", "https://x/c"),
            fetched("A", "https://x/a"),
            fetched("D", "https://x/d"),
            fetched("B", "https://x/b"),
        ];

        let new_articles = reconcile(&[stored("A")], fetched_articles, &[web("B", "https://y/b")]);
        let titles: Vec<_> = new_articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "D", "B"]);
    }

    #[test]
    fn test_links_never_keep_query() {
        let new_articles = reconcile(
            &[],
            vec![fetched("A", "https://x/a?source=rss"), fetched("B", "https://x/b?x=1&y=2")],
            &[],
        );
        assert!(new_articles.iter().all(|a| !a.link.contains('?')));
    }

    #[test]
    fn test_no_web_data_means_no_enrichment() {
        let new_articles = reconcile(&[], vec![fetched("A", "https://x/a")], &[]);
        assert_eq!(new_articles.len(), 1);
        assert!(new_articles[0].web_link.is_none());
    }

    #[test]
    fn test_empty_feed() {
        assert!(reconcile(&[stored("A")], Vec::new(), &[web("A", "https://y/a")]).is_empty());
    }
}
