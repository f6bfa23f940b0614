//! semsearch
//!
//! Semantic search over a precomputed embedding index.
//!
//! # Usage
//!
//! ```bash
//! semsearch search "how do lifetimes work" --index static/data/index.json
//! semsearch embed "some text"
//! semsearch build --input records.json --output index.json --text-field body
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/semsearch/config.toml)
//! 3. Environment variables (SEMSEARCH_*)
//! 4. CLI flags

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use semsearch_cli::{init_logging, load_settings, run_build, run_embed, run_search, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Search {
            query,
            index,
            top_k,
            json,
        } => {
            run_search(&settings, &query, index.as_deref(), top_k, json).await?;
        }
        Commands::Embed { text, raw } => {
            run_embed(&settings, &text, raw).await?;
        }
        Commands::Build {
            input,
            output,
            text_field,
            batch_size,
            strip_text,
        } => {
            run_build(
                &settings,
                Path::new(&input),
                Path::new(&output),
                &text_field,
                batch_size,
                strip_text,
            )
            .await?;
        }
    }

    Ok(())
}
