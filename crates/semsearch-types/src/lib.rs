//! # semsearch-types
//!
//! Shared configuration types for the semsearch workspace.
//!
//! Every other crate takes its tunables from [`Settings`]: which embedding
//! model to load, where to cache its files, how many ranked results a search
//! returns and where the default index lives.

pub mod config;
pub mod error;

pub use crate::config::{Settings, DEFAULT_MODEL_REPO, DEFAULT_TOP_K, ENV_PREFIX};
pub use error::ConfigError;
