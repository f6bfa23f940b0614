//! # semsearch-index
//!
//! The searchable index: entries carrying a quantized embedding `v` next
//! to opaque payload fields.
//!
//! An index is supplied from outside the search core, as a JSON array on
//! disk or served over HTTP, and is never mutated by a search. This crate
//! also builds such arrays from plain records.

pub mod builder;
pub mod entry;
pub mod error;
pub mod loader;

pub use builder::{IndexBuilder, DEFAULT_BATCH_SIZE};
pub use entry::{Index, IndexEntry, EMBEDDING_FIELD};
pub use error::IndexError;
pub use loader::{
    fetch_index, fetch_index_with, load_index, parse_index, read_index, write_index, IndexSource,
};
