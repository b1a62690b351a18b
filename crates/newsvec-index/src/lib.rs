//! Newsvec Index - Vector store abstraction
//!
//! Provisions the destination collection from the observed embedding
//! dimensionality and writes the article points in one batched upsert.
//! The collection is destructively recreated on every run; points
//! never outlive a single pipeline execution.

use async_trait::async_trait;
use newsvec_core::{Article, Result};
use serde::{Deserialize, Serialize};

pub mod qdrant_index;

pub use qdrant_index::QdrantIndex;

/// Metadata stored alongside each vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPayload {
    pub title: String,
    pub url: String,
    /// Snippet of the article body, independent of the embedding text
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// One persisted unit: sequential id, vector, payload
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// Trait for the destination vector index
#[async_trait]
pub trait ArticleIndex: Send + Sync {
    /// Destructively recreate the collection with the given vector
    /// dimensionality and a cosine distance metric
    async fn provision(&self, dimension: usize) -> Result<()>;

    /// Write all points in a single batched call
    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<()>;
}

/// Build index points from aligned article and embedding sequences
///
/// Ids are assigned by position, starting at 0; they carry no relation
/// to the feed-provided article ids. The caller guarantees the two
/// sequences are equal length and positionally aligned.
pub fn build_points(
    articles: &[Article],
    embeddings: Vec<Vec<f32>>,
    snippet_budget: usize,
) -> Vec<IndexPoint> {
    articles
        .iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (article, vector))| IndexPoint {
            id: i as u64,
            vector,
            payload: PointPayload {
                title: article.title.clone(),
                url: article.url.clone(),
                text: article.snippet(snippet_budget),
                published: article.published.clone(),
            },
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn article(i: usize, text: &str) -> Article {
        Article {
            id: format!("urn:item:{i}"),
            title: format!("Title {i}"),
            url: format!("https://example.com/{i}"),
            text: text.to_string(),
            published: None,
        }
    }

    #[test]
    fn test_build_points_sequential_ids_from_zero() {
        let articles = vec![article(0, "a"), article(1, "b"), article(2, "c")];
        let embeddings = vec![vec![0.0; 4]; 3];

        let points = build_points(&articles, embeddings, 400);
        let ids: Vec<u64> = points.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_build_points_positional_alignment() {
        let articles = vec![article(0, "first"), article(1, "second")];
        let embeddings = vec![vec![1.0, 1.0], vec![2.0, 2.0]];

        let points = build_points(&articles, embeddings, 400);
        assert_eq!(points[0].payload.title, "Title 0");
        assert_eq!(points[0].vector, vec![1.0, 1.0]);
        assert_eq!(points[1].payload.title, "Title 1");
        assert_eq!(points[1].vector, vec![2.0, 2.0]);
    }

    #[test]
    fn test_build_points_snippet_budgets() {
        let body = "z".repeat(600);
        let articles = vec![article(0, &body)];

        for budget in [200, 400, 500] {
            let points = build_points(&articles, vec![vec![0.0; 2]], budget);
            assert_eq!(points[0].payload.text, "z".repeat(budget));
        }
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        let payload = PointPayload {
            title: "t".to_string(),
            url: "u".to_string(),
            text: "s".to_string(),
            published: Some("2025-07-01 09:30:00".to_string()),
        };
        let json = serde_json::to_value(&payload).unwrap();
        let back: PointPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
