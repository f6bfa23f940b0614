//! Configuration loading for semsearch.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/semsearch/config.toml.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default sentence-embedding model on HuggingFace Hub (384 dimensions)
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Number of ranked results a search returns unless configured otherwise.
///
/// Older documentation of the web frontend mentions "top 10"; the ranking
/// code has always returned 25 and that is the value kept here.
pub const DEFAULT_TOP_K: usize = 25;

/// Prefix of environment variables read by [`Settings::load`]
pub const ENV_PREFIX: &str = "SEMSEARCH";

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HuggingFace repository id of the embedding model
    #[serde(default = "default_model_repo")]
    pub model_repo: String,

    /// Directory where downloaded model files are cached
    #[serde(default = "default_model_cache_dir")]
    pub model_cache_dir: String,

    /// Maximum number of results returned by a search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Default index location (file path or http(s) URL)
    #[serde(default)]
    pub index: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_model_repo() -> String {
    DEFAULT_MODEL_REPO.to_string()
}

fn default_model_cache_dir() -> String {
    ProjectDirs::from("", "", "semsearch")
        .map(|p| p.cache_dir().join("models"))
        .unwrap_or_else(|| PathBuf::from(".cache/semsearch/models"))
        .to_string_lossy()
        .to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_repo: default_model_repo(),
            model_cache_dir: default_model_cache_dir(),
            top_k: default_top_k(),
            index: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/semsearch/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (SEMSEARCH_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let user_config = ProjectDirs::from("", "", "semsearch")
            .map(|p| p.config_dir().join("config"))
            .unwrap_or_else(|| PathBuf::from("config"));

        Self::load_from(
            Some(&user_config),
            cli_config_path,
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Load from explicit sources: an optional user config file, an optional
    /// required config file and an environment source (normally
    /// `Environment::with_prefix("SEMSEARCH")`).
    pub fn load_from(
        user_config: Option<&Path>,
        cli_config_path: Option<&str>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("model_repo", default_model_repo())?
            .set_default("model_cache_dir", default_model_cache_dir())?
            .set_default("top_k", default_top_k() as i64)?
            .set_default("log_level", default_log_level())?;

        if let Some(path) = user_config {
            builder = builder.add_source(File::with_name(&path.to_string_lossy()).required(false));
        }

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SEMSEARCH_TOP_K, SEMSEARCH_MODEL_REPO, ...
        builder = builder.add_source(env.prefix_separator("_").separator("__").try_parsing(true));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be > 0".to_string()));
        }
        if self.model_repo.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "model_repo must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Expand ~ in model_cache_dir to the home directory
    pub fn expanded_model_cache_dir(&self) -> PathBuf {
        if let Some(rest) = self.model_cache_dir.strip_prefix("~/") {
            if let Some(dirs) = BaseDirs::new() {
                return dirs.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.model_cache_dir)
    }
}
