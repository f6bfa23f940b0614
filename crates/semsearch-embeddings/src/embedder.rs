//! Lazily loaded, process-shared embedder.
//!
//! Loading a model is slow (it may download weights) and the loaded model
//! is read-only afterwards, so one instance serves every caller. The model
//! sits behind an initialize-once cell: concurrent first calls wait on the
//! same load and never see a half-built model. A failed load leaves the
//! cell empty and the error goes to the caller; nothing is retried inside
//! that call.

use std::sync::{Arc, OnceLock};

use semsearch_types::Settings;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::cache::ModelCache;
use crate::candle::CandleEmbedder;
use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel};
use crate::quantize::QuantizedEmbedding;

/// Shared handle to a loaded model
pub type SharedModel = Arc<dyn EmbeddingModel>;

type Loader = dyn Fn() -> Result<SharedModel, EmbeddingError> + Send + Sync;

static GLOBAL: OnceLock<Embedder> = OnceLock::new();

/// Text-to-quantized-vector embedder with a lazily loaded model.
pub struct Embedder {
    model: OnceCell<SharedModel>,
    loader: Arc<Loader>,
}

impl Embedder {
    /// Embedder backed by the candle model in `cache`.
    pub fn new(cache: ModelCache) -> Self {
        Self::with_loader(move || {
            let model = CandleEmbedder::load(&cache)?;
            Ok(Arc::new(model) as SharedModel)
        })
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(ModelCache::from_settings(settings))
    }

    /// Embedder that calls `loader` on first use.
    ///
    /// The loader runs on the blocking thread pool.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<SharedModel, EmbeddingError> + Send + Sync + 'static,
    {
        Self {
            model: OnceCell::new(),
            loader: Arc::new(loader),
        }
    }

    /// Embedder around an already loaded model.
    pub fn with_model(model: SharedModel) -> Self {
        Self {
            model: OnceCell::new_with(Some(model)),
            loader: Arc::new(|| {
                Err::<SharedModel, _>(EmbeddingError::ModelLoad(
                    "embedder was built with a preloaded model".to_string(),
                ))
            }),
        }
    }

    /// Install the process-wide embedder.
    ///
    /// Fails, handing the embedder back, if one is already installed or
    /// [`Embedder::global`] has already created the default.
    pub fn install_global(embedder: Embedder) -> Result<(), Embedder> {
        GLOBAL.set(embedder)
    }

    /// The process-wide embedder, defaulting to the candle model in the
    /// default cache directory.
    pub fn global() -> &'static Embedder {
        GLOBAL.get_or_init(|| Embedder::new(ModelCache::default()))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Get the model, loading it on first use.
    pub async fn model(&self) -> Result<SharedModel, EmbeddingError> {
        let model = self
            .model
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let model = tokio::task::spawn_blocking(move || (*loader)())
                    .await
                    .map_err(|e| EmbeddingError::Task(e.to_string()))?
                    .map_err(EmbeddingError::into_model_load)?;
                info!(
                    model = %model.info().name,
                    dim = model.info().dimension,
                    "Embedding model ready"
                );
                Ok::<_, EmbeddingError>(model)
            })
            .await?;
        Ok(Arc::clone(model))
    }

    /// Embed text into the model's float space (unquantized).
    pub async fn embed_raw(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let model = self.model().await?;
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || model.embed(&text))
            .await
            .map_err(|e| EmbeddingError::Task(e.to_string()))?
    }

    /// Embed text and quantize it to int8.
    pub async fn embed(&self, text: &str) -> Result<QuantizedEmbedding, EmbeddingError> {
        let embedding = self.embed_raw(text).await?;
        debug!(dim = embedding.dimension(), "Embedded text");
        Ok(embedding.quantize())
    }

    /// Embed several texts in one model call and quantize each.
    pub async fn embed_batch(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<QuantizedEmbedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let model = self.model().await?;
        let embeddings = tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            model.embed_batch(&refs)
        })
        .await
        .map_err(|e| EmbeddingError::Task(e.to_string()))??;

        Ok(embeddings.iter().map(Embedding::quantize).collect())
    }
}
