//! # semsearch-embeddings
//!
//! Local text embeddings for semsearch using Candle.
//!
//! ## Features
//! - Local inference via Candle (no Python, no API)
//! - all-MiniLM-L6-v2 model by default (384 dimensions, mean-pooled, normalized)
//! - Model files cached after the first download
//! - Int8 quantization matching the stored index format
//! - One lazily loaded model shared by the whole process

pub mod cache;
pub mod candle;
pub mod embedder;
pub mod error;
pub mod mock;
pub mod model;
pub mod quantize;

pub use crate::candle::{CandleEmbedder, EMBEDDING_DIM, MAX_SEQ_LENGTH};
pub use cache::{ModelCache, ModelPaths, MODEL_FILES};
pub use embedder::{Embedder, SharedModel};
pub use error::EmbeddingError;
pub use mock::MockEmbedder;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
pub use quantize::{quantize, quantize_value, QuantizedEmbedding, QUANTIZATION_SCALE};
