//! Ranking of index entries against a query embedding.

use serde::Serialize;
use tracing::{debug, info};

use semsearch_embeddings::Embedder;
use semsearch_index::{Index, IndexEntry};
use semsearch_types::{Settings, DEFAULT_TOP_K};

use crate::error::RankError;
use crate::similarity::cosine_similarity;

/// An index entry paired with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredResult<'a> {
    pub entry: &'a IndexEntry,
    pub similarity: f32,
}

/// Ranking options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerConfig {
    /// Maximum results returned
    pub top_k: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RankerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            top_k: settings.top_k,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Score every entry against `query`, sort by descending similarity and keep
/// the first `limit`.
///
/// Entries with equal scores keep their index order. Any dimension mismatch
/// fails the whole ranking.
pub fn rank<'a>(
    index: &'a Index,
    query: &[i8],
    limit: usize,
) -> Result<Vec<ScoredResult<'a>>, RankError> {
    let mut results = index
        .iter()
        .map(|entry| {
            Ok(ScoredResult {
                entry,
                similarity: cosine_similarity(entry.embedding(), query)?,
            })
        })
        .collect::<Result<Vec<_>, RankError>>()?;

    // Stable sort: ties stay in input order
    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    results.truncate(limit);
    Ok(results)
}

/// Embeds queries and ranks an index against them.
pub struct Ranker<'e> {
    embedder: &'e Embedder,
    config: RankerConfig,
}

impl<'e> Ranker<'e> {
    pub fn new(embedder: &'e Embedder, config: RankerConfig) -> Self {
        Self { embedder, config }
    }

    pub fn config(&self) -> RankerConfig {
        self.config
    }

    /// Embed `query` and return the best `top_k` entries of `index`.
    ///
    /// The query is embedded even when the index is empty, so a model that
    /// cannot load is always reported.
    pub async fn search<'a>(
        &self,
        index: &'a Index,
        query: &str,
    ) -> Result<Vec<ScoredResult<'a>>, RankError> {
        let query_embedding = self.embedder.embed(query).await?;
        debug!(
            dim = query_embedding.dimension(),
            entries = index.len(),
            "Ranking"
        );

        let results = rank(index, query_embedding.values(), self.config.top_k)?;

        info!(
            query = %query,
            entries = index.len(),
            results = results.len(),
            best = results.first().map(|r| r.similarity),
            "Search complete"
        );
        Ok(results)
    }
}

impl Ranker<'static> {
    /// Ranker over the process-wide embedder with the default result limit.
    pub fn global() -> Self {
        Self::new(Embedder::global(), RankerConfig::default())
    }
}

/// Search `index` for `query` with the process-wide embedder, returning up
/// to [`DEFAULT_TOP_K`] results.
pub async fn search<'a>(
    index: &'a Index,
    query: &str,
) -> Result<Vec<ScoredResult<'a>>, RankError> {
    Ranker::global().search(index, query).await
}
