//! Newsvec Core - Domain models, errors, and configuration
//!
//! This crate defines the shared types used throughout the newsvec
//! ingestion pipeline:
//! - The canonical `Article` record
//! - The pipeline error taxonomy
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, EmbeddingBackendKind, EmbeddingConfig, FeedConfig, LoggingConfig,
    StoreConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Error taxonomy for a pipeline run
///
/// `SourceFetch` is recovered locally by the feed reader (the source is
/// skipped); every other variant is fatal and surfaces to the driver.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Feed source error: {0}")]
    SourceFetch(String),

    #[error("No articles collected from any source")]
    EmptyResult,

    #[error("Embedding backend error: {0}")]
    EmbeddingBackend(String),

    #[error("Index provisioning failed: {0}")]
    IndexProvision(String),

    #[error("Index write failed: {0}")]
    IndexWrite(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audit file error: {0}")]
    Audit(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

// ============================================================================
// Article Model
// ============================================================================

/// The canonical ingestible unit produced by the feed reader
///
/// `id` is the feed-provided unique identifier, falling back to the
/// article URL when the feed supplies none. `text` is the summary or
/// description body, empty if the source provides neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub url: String,
    pub text: String,

    /// Publication timestamp, normalized to a sortable format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

impl Article {
    /// Text submitted to the embedding backend, truncated to `budget` characters
    pub fn embedding_text(&self, budget: usize) -> String {
        truncate_chars(&self.text, budget)
    }

    /// Snippet persisted in the index payload, truncated to `budget` characters
    ///
    /// The snippet budget is independent of the embedding budget.
    pub fn snippet(&self, budget: usize) -> String {
        truncate_chars(&self.text, budget)
    }
}

/// Truncate a string to at most `budget` characters (not bytes)
pub fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        text.to_string()
    } else {
        text.chars().take(budget).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
