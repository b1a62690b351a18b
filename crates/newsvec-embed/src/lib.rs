//! Newsvec Embed - Embedding client abstraction
//!
//! Turns a batch of texts into a batch of equal-length vectors,
//! positionally aligned with the input. Two interchangeable backends
//! are selected by configuration: a batched remote embedding API and
//! a local embed server queried one text at a time.
//!
//! Both backends validate the response shape before returning:
//! a count mismatch or ragged dimensions fails the run instead of
//! silently mis-aligning vectors to articles.

use std::sync::Arc;

use async_trait::async_trait;
use newsvec_core::{EmbeddingBackendKind, EmbeddingConfig, PipelineError, Result};

pub mod local;
pub mod remote;

pub use local::LocalEmbedding;
pub use remote::RemoteEmbedding;

/// Trait for embedding generation
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate embeddings for a batch of texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Create an embedding client from config
pub fn create_embedding_client(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingClient>> {
    match config.backend {
        EmbeddingBackendKind::Remote => Ok(Arc::new(RemoteEmbedding::from_config(config)?)),
        EmbeddingBackendKind::Local => Ok(Arc::new(LocalEmbedding::from_config(config)?)),
    }
}

/// Check that a batch response is usable: one vector per input, all of
/// the same dimensionality.
pub(crate) fn validate_batch(
    backend: &str,
    input_count: usize,
    embeddings: &[Vec<f32>],
) -> Result<()> {
    if embeddings.len() != input_count {
        return Err(PipelineError::EmbeddingBackend(format!(
            "{backend} returned {} embeddings for {input_count} inputs",
            embeddings.len()
        )));
    }

    if let Some(first) = embeddings.first() {
        let dimension = first.len();
        if let Some(pos) = embeddings.iter().position(|v| v.len() != dimension) {
            return Err(PipelineError::EmbeddingBackend(format!(
                "{backend} returned inconsistent dimensions: vector {pos} has {} dims, expected {dimension}",
                embeddings[pos].len()
            )));
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_batch_accepts_aligned_output() {
        let vecs = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
        assert!(validate_batch("test", 2, &vecs).is_ok());
    }

    #[test]
    fn test_validate_batch_accepts_empty() {
        assert!(validate_batch("test", 0, &[]).is_ok());
    }

    #[test]
    fn test_validate_batch_rejects_count_mismatch() {
        let vecs = vec![vec![0.1, 0.2]];
        let err = validate_batch("test", 2, &vecs).unwrap_err();
        assert!(matches!(err, PipelineError::EmbeddingBackend(_)));
        assert!(err.to_string().contains("1 embeddings for 2 inputs"));
    }

    #[test]
    fn test_validate_batch_rejects_ragged_dimensions() {
        let vecs = vec![vec![0.1, 0.2], vec![0.3]];
        let err = validate_batch("test", 2, &vecs).unwrap_err();
        assert!(err.to_string().contains("inconsistent dimensions"));
    }

    #[test]
    fn test_factory_requires_credential_for_remote() {
        let config = EmbeddingConfig::default();
        assert!(config.api_key.is_none());
        assert!(create_embedding_client(&config).is_err());
    }

    #[test]
    fn test_factory_builds_local_without_credential() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackendKind::Local,
            ..Default::default()
        };
        let client = create_embedding_client(&config).unwrap();
        assert_eq!(client.name(), "local");
    }
}
