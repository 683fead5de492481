//! Run configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! CLI flags and environment variables. The resolved [`RunConfig`] is passed
//! explicitly into [`crate::run::run`]; nothing reads process-wide constants.
//!
//! ```yaml
//! store_path: ../blog/draft/articles.json
//! feed_url: https://wesley-wei.medium.com/feed
//! site: https://programmerscareer.com/
//! listing_urls:
//!   - https://programmerscareer.com/archives/
//!   - https://programmerscareer.com/archives/page/2/
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_STORE_PATH: &str = "articles.json";
pub const DEFAULT_FEED_URL: &str = "https://wesley-wei.medium.com/feed";
pub const DEFAULT_SITE: &str = "https://programmerscareer.com/";
pub const DEFAULT_LISTING_URLS: [&str; 2] = [
    "https://programmerscareer.com/archives/",
    "https://programmerscareer.com/archives/page/2/",
];
pub const DEFAULT_HEADING_SELECTOR: &str = "h6.title.is-6";

/// Everything a run needs to know about where to read and write.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// JSON file with previously seen articles.
    pub store_path: PathBuf,
    /// Syndication feed URL.
    pub feed_url: String,
    /// Base URL that relative archive hrefs are joined to.
    pub site: String,
    /// Archive listing pages, scraped in order.
    pub listing_urls: Vec<String>,
    /// Selector for the heading element wrapping each archive anchor.
    pub heading_selector: String,
    /// Skip persisting new articles.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            feed_url: DEFAULT_FEED_URL.to_string(),
            site: DEFAULT_SITE.to_string(),
            listing_urls: DEFAULT_LISTING_URLS.iter().map(|s| s.to_string()).collect(),
            heading_selector: DEFAULT_HEADING_SELECTOR.to_string(),
            dry_run: false,
        }
    }
}

impl RunConfig {
    /// Resolve the final configuration from defaults, the optional config
    /// file named by `--config`, and CLI overrides.
    ///
    /// # Errors
    ///
    /// Fails if the config file cannot be read or parsed, or if the resolved
    /// `site` is not an absolute URL.
    #[instrument(level = "info", skip_all)]
    pub async fn resolve(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let base = match &cli.config {
            Some(path) => Self::from_file(Path::new(path)).await?,
            None => Self::default(),
        };
        let config = base.with_overrides(cli);
        config.site_url()?;

        debug!(?config, "Resolved run configuration");
        Ok(config)
    }

    /// Load a YAML config file. Missing keys take their default values.
    pub async fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&raw)?;
        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply CLI/environment values on top of `self`.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.store_path {
            self.store_path = PathBuf::from(path);
        }
        if let Some(feed_url) = &cli.feed_url {
            self.feed_url = feed_url.clone();
        }
        if let Some(site) = &cli.site {
            self.site = site.clone();
        }
        if !cli.listing_urls.is_empty() {
            self.listing_urls = cli.listing_urls.clone();
        }
        if let Some(selector) = &cli.heading_selector {
            self.heading_selector = selector.clone();
        }
        self.dry_run |= cli.dry_run;
        self
    }

    /// The archive site as a parsed base URL.
    pub fn site_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.site)
    }
}
