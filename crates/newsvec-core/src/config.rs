//! Newsvec Configuration Management
//!
//! Handles configuration from environment variables and TOML config
//! files with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Vector store connection
    pub store: StoreConfig,

    /// Embedding backend selection and credentials
    pub embedding: EmbeddingConfig,

    /// Feed sources and ingestion limits
    pub feeds: FeedConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Vector store
        if let Ok(url) = std::env::var("QDRANT_URL") {
            config.store.url = url;
        }
        if let Ok(key) = std::env::var("QDRANT_API_KEY") {
            config.store.api_key = Some(key);
        }
        if let Ok(name) = std::env::var("QDRANT_COLLECTION") {
            config.store.collection = name;
        }

        // Embedding backend
        if let Ok(backend) = std::env::var("EMBEDDING_BACKEND") {
            config.embedding.backend = backend.parse()?;
        }
        if let Ok(url) = std::env::var("EMBEDDING_API_URL") {
            config.embedding.api_url = url;
        }
        if let Ok(key) = std::env::var("EMBEDDING_API_KEY") {
            config.embedding.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(url) = std::env::var("EMBED_SERVER_URL") {
            config.embedding.local_url = url;
        }

        // Feeds (comma-separated URLs)
        if let Ok(urls) = std::env::var("FEED_URLS") {
            config.feeds.sources = urls
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(max) = std::env::var("MAX_ARTICLES") {
            config.feeds.max_articles = max.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MAX_ARTICLES".to_string(),
                value: max,
            })?;
        }
        if let Ok(path) = std::env::var("AUDIT_PATH") {
            config.feeds.audit_path = path;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        if env_config.store.url != StoreConfig::default().url {
            self.store.url = env_config.store.url;
        }
        if env_config.store.collection != StoreConfig::default().collection {
            self.store.collection = env_config.store.collection;
        }
        if !env_config.feeds.sources.is_empty()
            && env_config.feeds.sources != FeedConfig::default().sources
        {
            self.feeds.sources = env_config.feeds.sources;
        }
        if env_config.embedding.backend != EmbeddingConfig::default().backend {
            self.embedding.backend = env_config.embedding.backend;
        }

        // Always use env for sensitive values
        if env_config.store.api_key.is_some() {
            self.store.api_key = env_config.store.api_key;
        }
        if env_config.embedding.api_key.is_some() {
            self.embedding.api_key = env_config.embedding.api_key;
        }

        Ok(self)
    }

    /// Copy with credentials masked, for operator-facing output
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.store.api_key.is_some() {
            config.store.api_key = Some("***".to_string());
        }
        if config.embedding.api_key.is_some() {
            config.embedding.api_key = Some("***".to_string());
        }
        config
    }
}

/// Vector store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Qdrant gRPC URL
    pub url: String,

    /// Qdrant API key (optional, for hosted instances)
    pub api_key: Option<String>,

    /// Destination collection name
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "news_articles".to_string(),
        }
    }
}

/// Embedding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which backend to use
    pub backend: EmbeddingBackendKind,

    /// Remote embedding API endpoint
    pub api_url: String,

    /// Credential for the remote backend
    pub api_key: Option<String>,

    /// Model identifier sent to the remote backend
    pub model: String,

    /// Base URL of the local embed server
    pub local_url: String,

    /// Character budget applied to article text before embedding
    pub char_budget: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackendKind::Remote,
            api_url: "https://api.jina.ai/v1/embeddings".to_string(),
            api_key: None,
            model: "jina-embeddings-v3".to_string(),
            local_url: "http://localhost:8000".to_string(),
            char_budget: 1000,
            timeout_secs: 60,
        }
    }
}

/// Supported embedding backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackendKind {
    /// Batched remote embedding API
    #[default]
    Remote,
    /// Local embed server, one text per request
    Local,
}

impl std::str::FromStr for EmbeddingBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            _ => Err(ConfigError::InvalidValue {
                key: "EMBEDDING_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Feed ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed source URLs, visited in order
    pub sources: Vec<String>,

    /// Overall article cap per run
    pub max_articles: usize,

    /// Pacing delay between sources in milliseconds
    pub source_delay_ms: u64,

    /// Character budget for the persisted payload snippet
    pub snippet_budget: usize,

    /// Path of the audit side file written after a successful run
    pub audit_path: String,

    /// Per-request timeout for feed fetches in seconds
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                "http://feeds.reuters.com/reuters/topNews".to_string(),
                "https://www.theguardian.com/world/rss".to_string(),
                "https://rss.nytimes.com/services/xml/rss/nyt/World.xml".to_string(),
                "https://feeds.bbci.co.uk/news/world/rss.xml".to_string(),
            ],
            max_articles: 50,
            source_delay_ms: 300,
            snippet_budget: 400,
            audit_path: "articles_fetched.json".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store.collection, "news_articles");
        assert_eq!(config.feeds.max_articles, 50);
        assert_eq!(config.embedding.char_budget, 1000);
        assert_eq!(config.feeds.snippet_budget, 400);
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(
            "remote".parse::<EmbeddingBackendKind>().unwrap(),
            EmbeddingBackendKind::Remote
        );
        assert_eq!(
            "LOCAL".parse::<EmbeddingBackendKind>().unwrap(),
            EmbeddingBackendKind::Local
        );
        assert!("gpu".parse::<EmbeddingBackendKind>().is_err());
    }

    #[test]
    fn test_redacted_masks_credentials() {
        let mut config = AppConfig::default();
        config.store.api_key = Some("secret-store".to_string());
        config.embedding.api_key = Some("secret-embed".to_string());

        let redacted = config.redacted();
        assert_eq!(redacted.store.api_key.as_deref(), Some("***"));
        assert_eq!(redacted.embedding.api_key.as_deref(), Some("***"));
        // Original untouched.
        assert_eq!(config.store.api_key.as_deref(), Some("secret-store"));
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            [store]
            url = "http://qdrant.internal:6334"
            collection = "headlines"

            [embedding]
            backend = "local"
            local_url = "http://embed.internal:8000"
            snippet = 0

            [feeds]
            sources = ["https://example.com/rss.xml"]
            max_articles = 10
            snippet_budget = 200
        "#;
        // Unknown keys are tolerated; missing sections fall back to defaults.
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.collection, "headlines");
        assert_eq!(config.embedding.backend, EmbeddingBackendKind::Local);
        assert_eq!(config.feeds.snippet_budget, 200);
        assert_eq!(config.logging.level, "info");
    }
}
