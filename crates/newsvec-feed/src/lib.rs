//! Newsvec Feed - RSS fetching and normalization
//!
//! Retrieves raw entries from a list of feed sources, converts them
//! into canonical `Article` records, and enforces deduplication and
//! the overall article cap.
//!
//! A failing source is logged and skipped; it never aborts the run.

use std::collections::HashSet;
use std::time::Duration;

use newsvec_core::{Article, FeedConfig, PipelineError, Result};
use rss::Channel;
use tracing::{debug, info, warn};

/// Reads feed sources in order, accumulating articles up to a cap
pub struct FeedReader {
    client: reqwest::Client,
    source_delay: Duration,
}

impl FeedReader {
    /// Create a reader with explicit timeouts and inter-source delay
    pub fn new(request_timeout: Duration, source_delay: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| PipelineError::SourceFetch(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            source_delay,
        })
    }

    /// Create from config
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            Duration::from_millis(config.source_delay_ms),
        )
    }

    /// Fetch articles from `sources` in list order, up to `max_count`
    ///
    /// Per-source failures (network or parse) are logged and skipped.
    /// A pacing delay is inserted between sources.
    pub async fn collect(&self, sources: &[String], max_count: usize) -> Vec<Article> {
        let mut out: Vec<Article> = Vec::new();

        for (i, url) in sources.iter().enumerate() {
            if out.len() >= max_count {
                break;
            }
            if i > 0 {
                tokio::time::sleep(self.source_delay).await;
            }

            match self.fetch_source(url, max_count - out.len()).await {
                Ok(mut articles) => {
                    info!(source = %url, count = articles.len(), "fetched feed");
                    out.append(&mut articles);
                }
                Err(e) => {
                    warn!(source = %url, error = %e, "skipping feed source");
                }
            }
        }

        out
    }

    async fn fetch_source(&self, url: &str, remaining: usize) -> Result<Vec<Article>> {
        debug!(source = %url, "fetching feed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::SourceFetch(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| PipelineError::SourceFetch(format!("bad status: {e}")))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::SourceFetch(format!("body read failed: {e}")))?;

        let channel = Channel::read_from(&bytes[..])
            .map_err(|e| PipelineError::SourceFetch(format!("feed parse failed: {e}")))?;

        Ok(channel
            .items()
            .iter()
            .take(remaining)
            .map(article_from_item)
            .collect())
    }
}

/// Map a raw feed item to the canonical `Article` record
///
/// `id` falls back to the link when the feed provides no guid; `text`
/// is the description, falling back to the full content body, else
/// empty.
pub fn article_from_item(item: &rss::Item) -> Article {
    let link = item.link().unwrap_or_default().to_string();
    let id = item
        .guid()
        .map(|g| g.value().to_string())
        .unwrap_or_else(|| link.clone());
    let text = item
        .description()
        .or_else(|| item.content())
        .unwrap_or_default()
        .to_string();

    // Normalize the RFC 2822 pubDate to a sortable format, dropping
    // values that fail to parse.
    let published = item.pub_date().and_then(|date_str| {
        chrono::DateTime::parse_from_rfc2822(date_str)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .ok()
    });

    Article {
        id,
        title: item.title().unwrap_or_default().to_string(),
        url: link,
        text,
        published,
    }
}

/// Remove duplicate articles by id and enforce the overall cap
///
/// First-seen-wins, stable order. Articles with an empty id carry no
/// identity and are never treated as duplicates of each other.
pub fn dedup_and_cap(articles: Vec<Article>, cap: usize) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<Article> = Vec::new();

    for article in articles {
        if out.len() >= cap {
            break;
        }
        if !article.id.is_empty() && !seen.insert(article.id.clone()) {
            debug!(id = %article.id, "dropping duplicate article");
            continue;
        }
        out.push(article);
    }

    out
}

// ============================================================================
// Tests
// ============================================================================
