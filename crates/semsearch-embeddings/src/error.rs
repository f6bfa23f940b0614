//! Embedding error types.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The embedding model could not be instantiated
    #[error("Failed to load embedding model: {0}")]
    ModelLoad(String),

    /// Candle model error
    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),

    /// Tokenizer error
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Model file not found or unreadable
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    /// Download error
    #[error("Failed to download model: {0}")]
    Download(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking task was cancelled or panicked
    #[error("Embedding task failed: {0}")]
    Task(String),

    /// Model produced no output for the input
    #[error("Empty model output for {0} input(s)")]
    EmptyOutput(usize),
}

impl EmbeddingError {
    /// Fold any error raised while instantiating a model into `ModelLoad`.
    pub fn into_model_load(self) -> Self {
        match self {
            Self::ModelLoad(_) => self,
            other => Self::ModelLoad(other.to_string()),
        }
    }
}
