//! The model seam: anything that maps text to a unit-length float vector.

use crate::error::EmbeddingError;
use crate::quantize::{quantize, QuantizedEmbedding};

/// Float model output, before quantization.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|x| x * x).sum::<f32>().sqrt()
}

impl Embedding {
    /// Scale `values` to unit length. A zero vector has no direction and is
    /// kept unchanged.
    pub fn new(mut values: Vec<f32>) -> Self {
        let norm = l2_norm(&values);
        if norm > 0.0 {
            values.iter_mut().for_each(|x| *x /= norm);
        }
        Self { values }
    }

    /// Wrap values the model already normalized.
    pub fn from_normalized(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn norm(&self) -> f32 {
        l2_norm(&self.values)
    }

    /// The int8 form stored in search indexes.
    pub fn quantize(&self) -> QuantizedEmbedding {
        quantize(&self.values)
    }
}

/// Static description of a loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Short name, e.g. "all-MiniLM-L6-v2"
    pub name: String,
    pub dimension: usize,
    /// Inputs longer than this many tokens are truncated
    pub max_sequence_length: usize,
}

/// A sentence-embedding model.
///
/// One loaded instance is shared by every caller in the process, hence
/// `Send + Sync`. Calls are blocking and CPU-bound.
pub trait EmbeddingModel: Send + Sync {
    fn info(&self) -> &ModelInfo;

    /// Mean-pooled, unit-length embedding of `text`.
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// One embedding per input, in input order. Models that can pad a batch
    /// into a single forward pass should override this.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
