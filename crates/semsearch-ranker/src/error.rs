//! Ranking error types.

use thiserror::Error;

use semsearch_embeddings::EmbeddingError;

/// Errors that abort a search. A search either returns a full ranking or
/// one of these; there are no partial results.
#[derive(Debug, Error)]
pub enum RankError {
    /// Compared vectors differ in length, usually an index built with a
    /// different model than the query embedder
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Query embedding failed (including model load failure)
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}
