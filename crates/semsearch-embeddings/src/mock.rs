//! Mock embedding model for testing.

use std::collections::HashMap;

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Mock model that produces deterministic embeddings without model files.
///
/// Texts registered with [`MockEmbedder::with_vector`] embed to that vector
/// (normalized); any other text is hashed into a bag-of-bytes vector, so
/// equal texts always embed equally. The empty string embeds to all zeros.
pub struct MockEmbedder {
    info: ModelInfo,
    fixed: HashMap<String, Vec<f32>>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            info: ModelInfo {
                name: "mock".to_string(),
                dimension,
                max_sequence_length: usize::MAX,
            },
            fixed: HashMap::new(),
        }
    }

    /// Pin the output for a specific text.
    pub fn with_vector(mut self, text: impl Into<String>, values: Vec<f32>) -> Self {
        self.fixed.insert(text.into(), values);
        self
    }

    fn hashed(&self, text: &str) -> Vec<f32> {
        let dim = self.info.dimension.max(1);
        let mut values = vec![0.0f32; self.info.dimension];
        if values.is_empty() {
            return values;
        }
        for (i, byte) in text.bytes().enumerate() {
            values[(i * 31 + byte as usize) % dim] += 1.0;
        }
        values
    }
}

impl EmbeddingModel for MockEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let values = match self.fixed.get(text) {
            Some(v) => v.clone(),
            None => self.hashed(text),
        };
        Ok(Embedding::new(values))
    }
}
