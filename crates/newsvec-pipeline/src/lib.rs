//! Newsvec Pipeline - Ingestion driver
//!
//! Sequences one run: fetch -> normalize -> dedup -> embed ->
//! provision -> upsert, then writes the audit side file. Per-source
//! fetch failures are recovered inside the feed reader; any failure in
//! the embedding, provisioning, or writing stages is fatal for the
//! run and propagates unchanged.
//!
//! The driver owns the article and embedding sequences for the
//! duration of a run; no state survives across runs.

use std::path::Path;
use std::sync::Arc;

use newsvec_core::{AppConfig, Article, PipelineError, Result};
use newsvec_embed::{create_embedding_client, EmbeddingClient};
use newsvec_feed::{dedup_and_cap, FeedReader};
use newsvec_index::{build_points, ArticleIndex, QdrantIndex};
use tracing::{info, warn};

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Zero articles were collected; no downstream calls were made
    NoArticles,
    /// The collection was recreated and fully written
    Indexed {
        articles: usize,
        dimension: usize,
    },
}

/// One-shot ingestion pipeline
pub struct Pipeline {
    config: AppConfig,
    reader: FeedReader,
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn ArticleIndex>,
}

impl Pipeline {
    /// Assemble a pipeline from explicit collaborators
    pub fn new(
        config: AppConfig,
        reader: FeedReader,
        embedder: Arc<dyn EmbeddingClient>,
        index: Arc<dyn ArticleIndex>,
    ) -> Self {
        Self {
            config,
            reader,
            embedder,
            index,
        }
    }

    /// Assemble a pipeline with real backends from config
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let reader = FeedReader::from_config(&config.feeds)?;
        let embedder = create_embedding_client(&config.embedding)?;
        let index: Arc<dyn ArticleIndex> = Arc::new(QdrantIndex::new(&config.store)?);

        Ok(Self::new(config, reader, embedder, index))
    }

    /// Execute one full ingestion run
    pub async fn run(&self) -> Result<RunOutcome> {
        info!(sources = self.config.feeds.sources.len(), "fetching feeds");
        let fetched = self
            .reader
            .collect(&self.config.feeds.sources, self.config.feeds.max_articles)
            .await;

        let articles = dedup_and_cap(fetched, self.config.feeds.max_articles);
        if articles.is_empty() {
            warn!("no articles collected from any source");
            return Ok(RunOutcome::NoArticles);
        }
        info!(count = articles.len(), "articles collected");

        // Embed, preserving positional alignment with `articles`.
        let texts: Vec<String> = articles
            .iter()
            .map(|a| a.embedding_text(self.config.embedding.char_budget))
            .collect();

        info!(backend = self.embedder.name(), "generating embeddings");
        let embeddings = self.embedder.embed_batch(&texts).await?;

        // Dimensionality is only known now; it depends on which backend
        // and model produced the vectors.
        let dimension = embeddings.first().map(|v| v.len()).unwrap_or(0);

        self.index.provision(dimension).await?;

        let points = build_points(&articles, embeddings, self.config.feeds.snippet_budget);
        let written = points.len();
        self.index.upsert(points).await?;

        write_audit(&self.config.feeds.audit_path, &articles)?;

        info!(articles = written, dimension, "run complete");
        Ok(RunOutcome::Indexed {
            articles: written,
            dimension,
        })
    }
}

/// Persist the fetched article sequence for inspection
///
/// Written only after a successful upsert; not read by any downstream
/// component.
pub fn write_audit(path: impl AsRef<Path>, articles: &[Article]) -> Result<()> {
    let json = serde_json::to_string_pretty(articles)
        .map_err(|e| PipelineError::Audit(format!("serialization failed: {e}")))?;
    std::fs::write(path.as_ref(), json)
        .map_err(|e| PipelineError::Audit(format!("write failed: {e}")))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
