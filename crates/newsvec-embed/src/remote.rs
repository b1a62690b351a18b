//! Remote embedding backend
//!
//! Issues a single batched request to an OpenAI/Jina-style
//! `/embeddings` endpoint carrying all texts, with a bearer
//! credential.

use std::time::Duration;

use async_trait::async_trait;
use newsvec_core::{EmbeddingConfig, PipelineError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{validate_batch, EmbeddingClient};

/// Batched remote embedding API client
pub struct RemoteEmbedding {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    input: Vec<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl RemoteEmbedding {
    /// Create a new remote embedding client
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            PipelineError::EmbeddingBackend(format!("HTTP client setup failed: {e}"))
        })?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Create from config; the credential is required
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config.api_key.as_ref().ok_or_else(|| {
            PipelineError::EmbeddingBackend("EMBEDDING_API_KEY not set".to_string())
        })?;

        Self::new(
            config.api_url.clone(),
            api_key.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl EmbeddingClient for RemoteEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            input: texts.to_vec(),
            model: self.model.clone(),
        };

        debug!(count = texts.len(), model = %self.model, "sending embedding batch");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PipelineError::EmbeddingBackend(format!("embedding request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::EmbeddingBackend(format!(
                "embedding API returned {status}: {error_text}"
            )));
        }

        let result: EmbeddingResponse = response.json().await.map_err(|e| {
            PipelineError::EmbeddingBackend(format!("failed to parse embedding response: {e}"))
        })?;

        // Restore input order, then extract the vectors.
        let mut data = result.data;
        data.sort_by_key(|d| d.index);
        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();

        validate_batch(self.name(), texts.len(), &embeddings)?;
        Ok(embeddings)
    }

    fn name(&self) -> &str {
        "remote"
    }
}
