//! Index entry and index types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use semsearch_embeddings::QuantizedEmbedding;

/// Name of the embedding field in every entry
pub const EMBEDDING_FIELD: &str = "v";

/// One searchable record.
///
/// `v` holds the quantized embedding; every other field is opaque payload
/// that is carried through to search results untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub v: QuantizedEmbedding,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl IndexEntry {
    pub fn new(v: impl Into<QuantizedEmbedding>, payload: Map<String, Value>) -> Self {
        Self {
            v: v.into(),
            payload,
        }
    }

    /// Look up a payload field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    pub fn embedding(&self) -> &[i8] {
        self.v.values()
    }
}

/// Ordered, read-only collection of entries.
///
/// Serializes as a bare JSON array, the format served as `index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension of the first entry, if any
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|e| e.v.dimension())
    }

    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }
}

impl From<Vec<IndexEntry>> for Index {
    fn from(entries: Vec<IndexEntry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a IndexEntry;
    type IntoIter = std::slice::Iter<'a, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_entry_payload_passthrough() {
        let raw = json!({"id": 7, "title": "Ownership", "tags": ["rust"], "v": [1, -2, 3]});
        let entry: IndexEntry = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(entry.embedding(), &[1, -2, 3]);
        assert_eq!(entry.get("title"), Some(&json!("Ownership")));
        assert!(entry.get("v").is_none());

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_entry_requires_v() {
        let raw = json!({"id": 1});
        assert!(serde_json::from_value::<IndexEntry>(raw).is_err());
    }

    #[test]
    fn test_index_is_bare_array() {
        let index: Index =
            serde_json::from_str(r#"[{"id":1,"v":[127,0]},{"id":2,"v":[0,127]}]"#).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.dimension(), Some(2));
        assert!(serde_json::to_string(&index).unwrap().starts_with('['));
    }

    #[test]
    fn test_empty_index() {
        let index = Index::default();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), None);
        assert_eq!(index.iter().count(), 0);
    }
}
