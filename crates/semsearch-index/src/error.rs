//! Index error types.

use thiserror::Error;

use semsearch_embeddings::EmbeddingError;

/// Errors that can occur while loading, writing or building an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not a JSON array of entries with a `v` field
    #[error("Invalid index document: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport or status error
    #[error("Failed to fetch index: {0}")]
    Http(#[from] reqwest::Error),

    /// Build input record is not a JSON object
    #[error("Record {position} is not a JSON object")]
    NotAnObject { position: usize },

    /// Build input record lacks the text field
    #[error("Record {position} has no string field '{field}'")]
    MissingText { position: usize, field: String },

    /// Embedding error while building
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}
