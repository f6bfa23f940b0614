//! Candle-based embedding implementation.
//!
//! Runs a BERT sentence-transformer (all-MiniLM-L6-v2 by default) on the CPU
//! and mean-pools the last hidden state over non-padding tokens.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::cache::ModelCache;
use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Embedding dimension for all-MiniLM-L6-v2
pub const EMBEDDING_DIM: usize = 384;

/// Maximum sequence length; longer inputs are truncated
pub const MAX_SEQ_LENGTH: usize = 256;

#[derive(Deserialize)]
struct HiddenSize {
    hidden_size: usize,
}

/// Candle-based BERT embedder.
pub struct CandleEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    info: ModelInfo,
}

impl CandleEmbedder {
    /// Load the embedding model from cache (downloading if needed).
    pub fn load(cache: &ModelCache) -> Result<Self, EmbeddingError> {
        let paths = cache.resolve()?;
        let name = cache
            .repo_id
            .rsplit('/')
            .next()
            .unwrap_or(&cache.repo_id)
            .to_string();
        Self::load_from_paths(name, &paths.config, &paths.tokenizer, &paths.weights)
    }

    pub fn load_default() -> Result<Self, EmbeddingError> {
        Self::load(&ModelCache::default())
    }

    /// Load from explicit file paths
    pub fn load_from_paths(
        name: impl Into<String>,
        config_path: &Path,
        tokenizer_path: &Path,
        weights_path: &Path,
    ) -> Result<Self, EmbeddingError> {
        let name = name.into();
        info!(model = %name, "Loading embedding model...");

        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(config_path)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| EmbeddingError::ModelNotFound(format!("Invalid config: {}", e)))?;
        let dimension = serde_json::from_str::<HiddenSize>(&config_str)
            .map(|h| h.hidden_size)
            .unwrap_or(EMBEDDING_DIM);

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        configure_truncation(&mut tokenizer)?;

        // SAFETY: the weights file is owned by the model cache and not
        // modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.to_path_buf()], DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;

        info!(
            model = %name,
            dim = dimension,
            max_seq = MAX_SEQ_LENGTH,
            "Model loaded successfully"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            info: ModelInfo {
                name,
                dimension,
                max_sequence_length: MAX_SEQ_LENGTH,
            },
        })
    }

    /// Mean pooling over token embeddings (excluding padding)
    fn mean_pooling(
        &self,
        embeddings: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor, EmbeddingError> {
        let mask = attention_mask
            .unsqueeze(2)?
            .broadcast_as(embeddings.shape())?
            .to_dtype(DType::F32)?;

        let sum = embeddings.broadcast_mul(&mask)?.sum(1)?;
        // Clamp so an all-padding row cannot divide by zero
        let count = mask.sum(1)?.clamp(1e-9, f64::MAX)?;

        Ok(sum.broadcast_div(&count)?)
    }

    /// Tokenize and pad a batch to its longest encoding.
    fn encode(&self, texts: &[&str]) -> Result<(Tensor, Tensor), EmbeddingError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut ids = Vec::with_capacity(texts.len() * seq_len);
        let mut mask = Vec::with_capacity(texts.len() * seq_len);
        for encoding in &encodings {
            let pad = seq_len - encoding.get_ids().len();
            ids.extend_from_slice(encoding.get_ids());
            mask.extend_from_slice(encoding.get_attention_mask());
            ids.extend(std::iter::repeat(0u32).take(pad));
            mask.extend(std::iter::repeat(0u32).take(pad));
        }

        let ids = Tensor::from_vec(ids, (texts.len(), seq_len), &self.device)?;
        let mask = Tensor::from_vec(mask, (texts.len(), seq_len), &self.device)?;
        Ok((ids, mask))
    }
}

/// Cap encodings at [`MAX_SEQ_LENGTH`] tokens inside the tokenizer, which
/// trims content and keeps the `[CLS]`/`[SEP]` markers.
fn configure_truncation(tokenizer: &mut Tokenizer) -> Result<(), EmbeddingError> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_SEQ_LENGTH,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
    Ok(())
}

impl EmbeddingModel for CandleEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or(EmbeddingError::EmptyOutput(1))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(count = texts.len(), "Embedding batch");

        let (input_ids, attention_mask) = self.encode(texts)?;
        let token_type_ids = input_ids.zeros_like()?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled: Vec<Vec<f32>> = self.mean_pooling(&output, &attention_mask)?.to_vec2()?;

        let embeddings: Vec<Embedding> = pooled.into_iter().map(Embedding::new).collect();
        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::EmptyOutput(texts.len()));
        }

        debug!(
            count = embeddings.len(),
            dim = self.info.dimension,
            "Batch complete"
        );
        Ok(embeddings)
    }
}
