//! Index building.
//!
//! Turns arbitrary JSON records into index entries by embedding one of
//! their text fields with the same embedder that later embeds queries.

use serde_json::{Map, Value};
use tracing::{debug, info};

use semsearch_embeddings::Embedder;

use crate::entry::{Index, IndexEntry, EMBEDDING_FIELD};
use crate::error::IndexError;

/// Default number of records embedded per model call
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Builds an [`Index`] from records.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    text_field: String,
    batch_size: usize,
    strip_text: bool,
}

impl IndexBuilder {
    /// Builder that embeds the string field `text_field` of each record.
    pub fn new(text_field: impl Into<String>) -> Self {
        Self {
            text_field: text_field.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            strip_text: false,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Drop the embedded text field from the stored payload.
    pub fn with_strip_text(mut self, strip: bool) -> Self {
        self.strip_text = strip;
        self
    }

    /// Embed every record, preserving input order.
    ///
    /// An existing `v` field in a record is replaced.
    pub async fn build(
        &self,
        embedder: &Embedder,
        records: Vec<Value>,
    ) -> Result<Index, IndexError> {
        let mut pending: Vec<(String, Map<String, Value>)> = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let Value::Object(mut payload) = record else {
                return Err(IndexError::NotAnObject { position });
            };
            let text = match payload.get(&self.text_field) {
                Some(Value::String(text)) => text.clone(),
                _ => {
                    return Err(IndexError::MissingText {
                        position,
                        field: self.text_field.clone(),
                    })
                }
            };
            payload.remove(EMBEDDING_FIELD);
            if self.strip_text {
                payload.remove(&self.text_field);
            }
            pending.push((text, payload));
        }

        let total = pending.len();
        let mut entries = Vec::with_capacity(total);
        let mut pending = pending.into_iter().peekable();
        while pending.peek().is_some() {
            let chunk: Vec<(String, Map<String, Value>)> =
                pending.by_ref().take(self.batch_size).collect();
            let (texts, payloads): (Vec<String>, Vec<Map<String, Value>>) =
                chunk.into_iter().unzip();

            let embeddings = embedder.embed_batch(texts).await?;
            entries.extend(
                embeddings
                    .into_iter()
                    .zip(payloads)
                    .map(|(v, payload)| IndexEntry::new(v, payload)),
            );
            debug!(done = entries.len(), total, "Embedded batch");
        }

        info!(entries = entries.len(), field = %self.text_field, "Index built");
        Ok(Index::new(entries))
    }
}
