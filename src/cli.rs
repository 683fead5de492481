//! Command-line interface definitions for postwatch.
//!
//! Every option can also be supplied through an environment variable. Options
//! left unset fall back to the YAML config file (if given) and then to the
//! built-in defaults in [`crate::config::RunConfig`].

use clap::Parser;

/// Command-line arguments for a single reconciliation run.
///
/// # Examples
///
/// ```sh
/// # Use the built-in defaults
/// postwatch
///
/// # Point at a different store and only scrape the first archive page
/// postwatch --store-path ../blog/draft/articles.json \
///     --listing-url https://programmerscareer.com/archives/
///
/// # Load settings from a file, see what is new without writing anything
/// postwatch --config postwatch.yaml --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "POSTWATCH_CONFIG")]
    pub config: Option<String>,

    /// JSON file holding previously seen articles
    #[arg(short, long, env = "POSTWATCH_STORE")]
    pub store_path: Option<String>,

    /// Syndication feed of the author's posts
    #[arg(short, long, env = "POSTWATCH_FEED_URL")]
    pub feed_url: Option<String>,

    /// Base URL that archive hrefs are resolved against
    #[arg(long, env = "POSTWATCH_SITE")]
    pub site: Option<String>,

    /// Archive listing page to scrape (repeatable, or comma separated)
    #[arg(
        short,
        long = "listing-url",
        env = "POSTWATCH_LISTING_URLS",
        value_delimiter = ','
    )]
    pub listing_urls: Vec<String>,

    /// CSS selector for the heading that wraps each archive entry's anchor
    #[arg(long, env = "POSTWATCH_HEADING_SELECTOR")]
    pub heading_selector: Option<String>,

    /// Report new articles without writing the store
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_are_unset() {
        let cli = Cli::parse_from(["postwatch"]);

        assert!(cli.config.is_none());
        assert!(cli.store_path.is_none());
        assert!(cli.listing_urls.is_empty());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "postwatch",
            "--store-path",
            "/tmp/articles.json",
            "--feed-url",
            "https://example.com/feed",
            "--site",
            "https://example.org/",
            "--dry-run",
        ]);

        assert_eq!(cli.store_path.as_deref(), Some("/tmp/articles.json"));
        assert_eq!(cli.feed_url.as_deref(), Some("https://example.com/feed"));
        assert_eq!(cli.site.as_deref(), Some("https://example.org/"));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_listing_urls_repeat_and_split() {
        let cli = Cli::parse_from([
            "postwatch",
            "-l",
            "https://example.org/archives/",
            "--listing-url",
            "https://example.org/archives/page/2/,https://example.org/archives/page/3/",
        ]);

        assert_eq!(
            cli.listing_urls,
            vec![
                "https://example.org/archives/",
                "https://example.org/archives/page/2/",
                "https://example.org/archives/page/3/",
            ]
        );
    }
}
