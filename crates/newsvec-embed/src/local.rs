//! Local embedding backend
//!
//! Client of the local embed server (`POST /embed`, one text per
//! call). The server has no batch endpoint, so batches are processed
//! sequentially.

use std::time::Duration;

use async_trait::async_trait;
use newsvec_core::{EmbeddingConfig, PipelineError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{validate_batch, EmbeddingClient};

/// Local embed server client
pub struct LocalEmbedding {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl LocalEmbedding {
    /// Create a new local embedding client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            PipelineError::EmbeddingBackend(format!("HTTP client setup failed: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create from config
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        Self::new(
            config.local_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/embed", self.base_url))
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| {
                PipelineError::EmbeddingBackend(format!("embed server request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::EmbeddingBackend(format!(
                "embed server returned {status}: {error_text}"
            )));
        }

        let result: EmbedResponse = response.json().await.map_err(|e| {
            PipelineError::EmbeddingBackend(format!("failed to parse embed response: {e}"))
        })?;

        Ok(result.embedding)
    }
}

#[async_trait]
impl EmbeddingClient for LocalEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }

        validate_batch(self.name(), texts.len(), &embeddings)?;
        Ok(embeddings)
    }

    fn name(&self) -> &str {
        "local"
    }
}
