//! Model file caching.
//!
//! Model files are fetched from HuggingFace Hub once and kept in a local
//! directory keyed by repository id. A file only counts as cached after it
//! has been fully copied into place.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use semsearch_types::{Settings, DEFAULT_MODEL_REPO};

use crate::error::EmbeddingError;

/// Files a BERT sentence-embedding model needs
pub const MODEL_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];

/// Location of cached model files for one repository.
#[derive(Debug, Clone)]
pub struct ModelCache {
    /// Cache root directory
    pub cache_dir: PathBuf,
    /// Model repository ID
    pub repo_id: String,
}

impl Default for ModelCache {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("semsearch")
            .join("models");

        Self {
            cache_dir,
            repo_id: DEFAULT_MODEL_REPO.to_string(),
        }
    }
}

impl ModelCache {
    pub fn new(cache_dir: impl Into<PathBuf>, repo_id: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            repo_id: repo_id.into(),
        }
    }

    /// Build from the `model_cache_dir` and `model_repo` settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.expanded_model_cache_dir(),
            settings.model_repo.clone(),
        )
    }

    /// Directory holding this repository's files
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(self.repo_id.replace('/', "_"))
    }

    /// Scratch directory used by the hub client while downloading
    fn hub_dir(&self) -> PathBuf {
        self.cache_dir.join(".hub")
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.model_dir().join(filename)
    }

    /// Check if every model file is present
    pub fn is_cached(&self) -> bool {
        MODEL_FILES.iter().all(|f| self.file_path(f).is_file())
    }

    /// Return local paths to the model files, downloading any that are missing.
    pub fn resolve(&self) -> Result<ModelPaths, EmbeddingError> {
        if self.is_cached() {
            debug!(path = ?self.model_dir(), "Using cached model");
        } else {
            info!(repo = %self.repo_id, "Downloading model files...");
            self.download_missing()?;
        }

        Ok(ModelPaths {
            config: self.file_path("config.json"),
            tokenizer: self.file_path("tokenizer.json"),
            weights: self.file_path("model.safetensors"),
        })
    }

    fn download_missing(&self) -> Result<(), EmbeddingError> {
        use hf_hub::api::sync::ApiBuilder;

        let api = ApiBuilder::new()
            .with_cache_dir(self.hub_dir())
            .with_progress(false)
            .build()
            .map_err(|e| EmbeddingError::Download(e.to_string()))?;
        let repo = api.model(self.repo_id.clone());

        std::fs::create_dir_all(self.model_dir())?;

        for filename in MODEL_FILES {
            let dest = self.file_path(filename);
            if dest.is_file() {
                continue;
            }

            info!(file = filename, "Downloading...");
            let source = repo
                .get(filename)
                .map_err(|e| EmbeddingError::Download(format!("{}: {}", filename, e)))?;
            install_file(&source, &dest)?;
            debug!(file = filename, dest = ?dest, "Installed");
        }

        Ok(())
    }
}

/// Copy next to the destination, then rename, so a partial copy is never
/// mistaken for a cached file.
fn install_file(source: &Path, dest: &Path) -> Result<(), EmbeddingError> {
    let partial = dest.with_extension("partial");
    std::fs::copy(source, &partial)?;
    std::fs::rename(&partial, dest)?;
    Ok(())
}

/// Paths to model files
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}
