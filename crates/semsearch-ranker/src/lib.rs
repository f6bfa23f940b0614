//! # semsearch-ranker
//!
//! Semantic search over an in-memory embedding index.
//!
//! A query is embedded with the same model and quantization as the index,
//! every entry is scored by cosine similarity, and the best `top_k` (25 by
//! default) are returned, highest first.
//!
//! ```no_run
//! # async fn demo(index: &semsearch_index::Index) -> Result<(), semsearch_ranker::RankError> {
//! for hit in semsearch_ranker::search(index, "borrow checker").await? {
//!     println!("{:.3} {:?}", hit.similarity, hit.entry.get("title"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod rank;
pub mod similarity;

pub use error::RankError;
pub use rank::{rank, search, Ranker, RankerConfig, ScoredResult};
pub use similarity::cosine_similarity;
