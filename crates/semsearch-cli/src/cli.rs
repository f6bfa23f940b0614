//! CLI argument parsing for semsearch.
//!
//! CLI flags override every other config source.

use clap::{Parser, Subcommand};

/// Semantic search over a precomputed embedding index
#[derive(Parser, Debug)]
#[command(name = "semsearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/semsearch/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank index entries by similarity to a query
    Search {
        /// Query text
        query: String,

        /// Index file path or http(s) URL (default from config)
        #[arg(short, long)]
        index: Option<String>,

        /// Maximum results (default from config, 25 if unset)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the quantized embedding of a text as a JSON array
    Embed {
        /// Text to embed
        text: String,

        /// Print the unquantized float vector instead
        #[arg(long)]
        raw: bool,
    },

    /// Build an index from a JSON array of records
    Build {
        /// Input JSON file (array of objects)
        #[arg(short, long)]
        input: String,

        /// Output index file
        #[arg(short, long)]
        output: String,

        /// Record field holding the text to embed
        #[arg(short = 'f', long, default_value = "text")]
        text_field: String,

        /// Records embedded per model call
        #[arg(long, default_value = "32")]
        batch_size: usize,

        /// Omit the text field from the written entries
        #[arg(long)]
        strip_text: bool,
    },
}
