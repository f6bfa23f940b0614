//! semsearch command-line library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (search, embed, build)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{apply_overrides, format_result, init_logging, install_embedder, load_settings};
pub use commands::{embed_output, run_build, run_embed, run_search, search_output};
