//! Elasticsearch-compatible bulk indexing client

use crate::config::IndexConfig;
use crate::error::{JobSynonymsError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

pub type SearchDocument = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub sent: usize,
    pub failed: usize,
    pub batches: usize,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Map<String, Value>>,
}

pub struct IndexClient {
    client: reqwest::Client,
    base_url: String,
    batch_size: usize,
}

impl IndexClient {
    pub fn new(base_url: &str, batch_size: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, batch_size))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, batch_size: usize) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        Self::new(&config.url, config.batch_size, Duration::from_secs(config.timeout_secs))
    }

    /// Index every document in `_bulk` batches; per-document rejections are counted, not fatal
    pub async fn bulk_index(&self, index: &str, documents: &[SearchDocument]) -> Result<IndexStats> {
        if index.trim().is_empty() {
            return Err(JobSynonymsError::InvalidInput("Index name must not be empty".to_string()));
        }

        let mut stats = IndexStats::default();
        for batch in documents.chunks(self.batch_size) {
            let failed = self.send_batch(index, batch).await?;
            stats.sent += batch.len();
            stats.failed += failed;
            stats.batches += 1;
            debug!("Batch {}: {} documents, {} rejected", stats.batches, batch.len(), failed);
        }

        info!(
            "Indexed {} documents into '{}' in {} batches ({} rejected)",
            stats.sent - stats.failed,
            index,
            stats.batches,
            stats.failed
        );
        Ok(stats)
    }

    async fn send_batch(&self, index: &str, batch: &[SearchDocument]) -> Result<usize> {
        let endpoint = format!("{}/_bulk", self.base_url);
        let body = bulk_body(index, batch)?;

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(JobSynonymsError::IndexApi {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        count_failures(&text)
    }
}

/// NDJSON action/source pairs for `_bulk`
pub fn bulk_body(index: &str, documents: &[SearchDocument]) -> Result<String> {
    let action = serde_json::to_string(&json!({ "index": { "_index": index } }))?;
    let mut body = String::new();
    for document in documents {
        body.push_str(&action);
        body.push('\n');
        body.push_str(&serde_json::to_string(document)?);
        body.push('\n');
    }
    Ok(body)
}

/// Number of items a bulk response reports as rejected
pub fn count_failures(response: &str) -> Result<usize> {
    let parsed: BulkResponse = serde_json::from_str(response)?;
    if !parsed.errors {
        return Ok(0);
    }

    let mut failed = 0;
    for item in &parsed.items {
        for result in item.values() {
            let status = result.get("status").and_then(Value::as_u64).unwrap_or(0);
            if let Some(error) = result.get("error") {
                warn!("Document rejected (status {}): {}", status, error);
                failed += 1;
            } else if status >= 300 {
                warn!("Document rejected with status {}", status);
                failed += 1;
            }
        }
    }
    Ok(failed)
}
