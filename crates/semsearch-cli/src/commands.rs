//! Command implementations for semsearch.
//!
//! Results go to stdout; logs go to stderr so JSON output stays clean.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use semsearch_embeddings::Embedder;
use semsearch_index::{load_index, write_index, IndexBuilder, IndexSource};
use semsearch_ranker::{Ranker, RankerConfig, ScoredResult};
use semsearch_types::Settings;

/// Load configuration (defaults -> file -> env) and apply CLI overrides.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let settings = Settings::load(config_path).context("Failed to load configuration")?;
    Ok(apply_overrides(settings, log_level))
}

/// Apply CLI flags on top of loaded settings.
pub fn apply_overrides(mut settings: Settings, log_level: Option<&str>) -> Settings {
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    settings
}

/// Initialize logging. `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Make the configured model the process-wide embedder.
pub fn install_embedder(settings: &Settings) -> &'static Embedder {
    if Embedder::install_global(Embedder::from_settings(settings)).is_err() {
        warn!("Embedder already initialized, keeping existing model settings");
    }
    Embedder::global()
}

/// Search an index and print the ranked entries.
pub async fn run_search(
    settings: &Settings,
    query: &str,
    index_override: Option<&str>,
    top_k_override: Option<usize>,
    json: bool,
) -> Result<()> {
    let output = search_output(settings, query, index_override, top_k_override, json).await?;
    println!("{}", output);
    Ok(())
}

/// Search an index and render the ranked entries, as pretty JSON or one
/// line per result.
pub async fn search_output(
    settings: &Settings,
    query: &str,
    index_override: Option<&str>,
    top_k_override: Option<usize>,
    json: bool,
) -> Result<String> {
    let location = index_override
        .map(str::to_string)
        .or_else(|| settings.index.clone())
        .context("No index given: pass --index or set `index` in the config")?;

    let top_k = top_k_override.unwrap_or(settings.top_k);
    if top_k == 0 {
        bail!("--top-k must be > 0");
    }

    let source = IndexSource::parse(&location);
    let index = load_index(&source)
        .await
        .with_context(|| format!("Failed to load index from {}", source))?;

    let embedder = install_embedder(settings);
    let ranker = Ranker::new(
        embedder,
        RankerConfig::from_settings(settings).with_top_k(top_k),
    );
    let results = ranker
        .search(&index, query)
        .await
        .context("Search failed")?;

    if json {
        return Ok(serde_json::to_string_pretty(&results)?);
    }
    if results.is_empty() {
        return Ok("No results.".to_string());
    }
    let lines: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(rank, result)| format_result(rank + 1, result))
        .collect();
    Ok(lines.join("\n"))
}

/// One line per result: rank, score, compact payload.
pub fn format_result(rank: usize, result: &ScoredResult<'_>) -> String {
    let payload = Value::Object(result.entry.payload.clone());
    format!("{:>3}. {:>7.4}  {}", rank, result.similarity, payload)
}

/// Print the embedding of `text` as a JSON array.
pub async fn run_embed(settings: &Settings, text: &str, raw: bool) -> Result<()> {
    println!("{}", embed_output(settings, text, raw).await?);
    Ok(())
}

/// The embedding of `text` as a compact JSON array, quantized unless `raw`.
pub async fn embed_output(settings: &Settings, text: &str, raw: bool) -> Result<String> {
    let embedder = install_embedder(settings);
    if raw {
        let embedding = embedder.embed_raw(text).await.context("Embedding failed")?;
        Ok(serde_json::to_string(&embedding.values)?)
    } else {
        let embedding = embedder.embed(text).await.context("Embedding failed")?;
        Ok(serde_json::to_string(&embedding)?)
    }
}

/// Embed the text field of every input record and write the index.
pub async fn run_build(
    settings: &Settings,
    input: &Path,
    output: &Path,
    text_field: &str,
    batch_size: usize,
    strip_text: bool,
) -> Result<()> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read {:?}", input))?;
    let records: Vec<Value> = serde_json::from_slice(&bytes)
        .with_context(|| format!("{:?} is not a JSON array", input))?;
    info!(records = records.len(), input = ?input, "Building index");

    let embedder = install_embedder(settings);
    let index = IndexBuilder::new(text_field)
        .with_batch_size(batch_size)
        .with_strip_text(strip_text)
        .build(embedder, records)
        .await
        .context("Failed to build index")?;

    write_index(output, &index)
        .await
        .with_context(|| format!("Failed to write {:?}", output))?;
    println!("Wrote {} entries to {}", index.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use semsearch_index::IndexEntry;
    use serde_json::{json, Map};
    use tempfile::TempDir;

    fn entry_with(payload: Value) -> IndexEntry {
        let Value::Object(payload) = payload else {
            panic!("payload must be an object");
        };
        IndexEntry::new(vec![90i8, 90, 0], payload)
    }

    #[test]
    fn test_format_result() {
        let entry = entry_with(json!({"id": 3}));
        let result = ScoredResult {
            entry: &entry,
            similarity: 0.70710677,
        };
        assert_eq!(format_result(2, &result), "  2.  0.7071  {\"id\":3}");
    }

    #[test]
    fn test_format_result_nested_payload() {
        let entry = entry_with(json!({"id": "a", "meta": {"tags": ["x", "y"]}}));
        let result = ScoredResult {
            entry: &entry,
            similarity: -0.5,
        };
        assert_eq!(
            format_result(10, &result),
            " 10. -0.5000  {\"id\":\"a\",\"meta\":{\"tags\":[\"x\",\"y\"]}}"
        );
    }

    #[test]
    fn test_format_result_empty_payload() {
        let entry = IndexEntry::new(vec![1i8], Map::new());
        let result = ScoredResult {
            entry: &entry,
            similarity: 1.0,
        };
        assert_eq!(format_result(1, &result), "  1.  1.0000  {}");
    }

    #[tokio::test]
    async fn test_search_requires_index() {
        let settings = Settings::default();
        let err = run_search(&settings, "q", None, None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No index given"));
    }

    #[tokio::test]
    async fn test_search_rejects_zero_top_k() {
        let settings = Settings::default();
        let err = run_search(&settings, "q", Some("index.json"), Some(0), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--top-k"));
    }

    #[tokio::test]
    async fn test_search_missing_index_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.json");
        let settings = Settings::default();
        let err = run_search(&settings, "q", Some(&path.to_string_lossy()), None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load index"));
    }

    #[tokio::test]
    async fn test_build_rejects_non_array_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("records.json");
        std::fs::write(&input, "{\"text\": \"x\"}").unwrap();
        let err = run_build(
            &Settings::default(),
            &input,
            &temp.path().join("index.json"),
            "text",
            32,
            false,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("is not a JSON array"));
    }

    #[test]
    fn test_apply_overrides_log_level() {
        let settings = Settings {
            log_level: "warn".to_string(),
            top_k: 3,
            ..Settings::default()
        };

        let overridden = apply_overrides(settings.clone(), Some("trace"));
        assert_eq!(overridden.log_level, "trace");
        assert_eq!(overridden.top_k, 3);

        let untouched = apply_overrides(settings, None);
        assert_eq!(untouched.log_level, "warn");
    }
}
