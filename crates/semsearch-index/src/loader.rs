//! Index loading.
//!
//! An index is a JSON array of entries, read from a local file or fetched
//! over HTTP. Either way it is fully materialized before anything searches
//! it.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::header::ACCEPT;
use tracing::{debug, info};

use crate::entry::Index;
use crate::error::IndexError;

/// Where an index document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    File(PathBuf),
    Url(String),
}

impl IndexSource {
    /// Treat `http://` and `https://` locations as URLs and anything else as
    /// a file path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Load an index from any source.
pub async fn load_index(source: &IndexSource) -> Result<Index, IndexError> {
    let index = match source {
        IndexSource::File(path) => read_index(path).await?,
        IndexSource::Url(url) => fetch_index(url).await?,
    };
    info!(source = %source, entries = index.len(), "Index loaded");
    Ok(index)
}

/// Parse an index document.
pub fn parse_index(bytes: &[u8]) -> Result<Index, IndexError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read an index from a local JSON file.
pub async fn read_index(path: &Path) -> Result<Index, IndexError> {
    debug!(path = ?path, "Reading index file");
    let bytes = tokio::fs::read(path).await?;
    parse_index(&bytes)
}

/// Fetch an index over HTTP. Non-success statuses are errors.
pub async fn fetch_index(url: &str) -> Result<Index, IndexError> {
    fetch_index_with(&reqwest::Client::new(), url).await
}

/// Fetch an index with a caller-configured HTTP client.
pub async fn fetch_index_with(client: &reqwest::Client, url: &str) -> Result<Index, IndexError> {
    debug!(url = %url, "Fetching index");
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?;
    let bytes = response.bytes().await?;
    parse_index(&bytes)
}

/// Write an index as a JSON document.
pub async fn write_index(path: &Path, index: &Index) -> Result<(), IndexError> {
    let bytes = serde_json::to_vec(index)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    info!(path = ?path, entries = index.len(), "Index written");
    Ok(())
}
