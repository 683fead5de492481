//! JSON-file store of previously seen articles.
//!
//! The store is a single pretty-printed JSON array of [`ArticleRecord`]s:
//!
//! ```json
//! [
//!     {
//!         "title": "Understanding Go's Memory Model",
//!         "link": "https://wesley-wei.medium.com/understanding-gos-memory-model-1a2b3c",
//!         "published": "Mon, 01 Jul 2024 10:00:00 +0000",
//!         "web_link": "https://programmerscareer.com/go-memory-model/"
//!     }
//! ]
//! ```
//!
//! A missing file means this is the first run. Writes replace the whole file
//! by renaming a sibling temporary file over it.

use crate::models::ArticleRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Load the stored articles, or an empty list if the store does not exist yet.
///
/// # Errors
///
/// Any I/O failure other than "not found", and any malformed JSON, is
/// returned to the caller.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No store yet; starting from an empty article list");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let articles: Vec<ArticleRecord> = serde_json::from_str(&raw)?;
    info!(count = articles.len(), "Loaded stored articles");
    Ok(articles)
}

/// Overwrite the store with `articles`.
///
/// Output is UTF-8 with four-space indentation; non-ASCII text is written
/// as-is rather than escaped. Missing parent directories are created.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn save(path: &Path, articles: &[ArticleRecord]) -> Result<(), Box<dyn Error>> {
    let json = to_pretty_json(articles)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(parent = %parent.display(), error = %e, "Failed to create store directory");
            return Err(e.into());
        }
    }

    let tmp = temp_path(path)?;
    fs::write(&tmp, json).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        error!(tmp = %tmp.display(), error = %e, "Failed to move store into place");
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    info!("Wrote article store");
    Ok(())
}

fn to_pretty_json(articles: &[ArticleRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    articles.serialize(&mut ser)?;
    Ok(buf)
}

fn temp_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let name = path
        .file_name()
        .ok_or_else(|| format!("store path {} has no file name", path.display()))?;
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
