//! Qdrant implementation of the article index
//!
//! Provides collection recreation and batched point upsert over the
//! Qdrant gRPC client.

use async_trait::async_trait;
use newsvec_core::{PipelineError, Result, StoreConfig};
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use tracing::{debug, info};

use crate::{ArticleIndex, IndexPoint};

/// Qdrant-backed article index
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantIndex {
    /// Create a new Qdrant connection
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.url);
        if let Some(key) = &config.api_key {
            builder = builder.api_key(key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| PipelineError::IndexProvision(format!("Qdrant connection failed: {e}")))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
        })
    }
}

#[async_trait]
impl ArticleIndex for QdrantIndex {
    async fn provision(&self, dimension: usize) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| PipelineError::IndexProvision(format!("failed to list collections: {e}")))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        // Unconditional replacement: any prior schema or data is discarded.
        if exists {
            debug!(collection = %self.collection, "dropping existing collection");
            self.client
                .delete_collection(self.collection.as_str())
                .await
                .map_err(|e| {
                    PipelineError::IndexProvision(format!("failed to delete collection: {e}"))
                })?;
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| {
                PipelineError::IndexProvision(format!("failed to create collection: {e}"))
            })?;

        info!(collection = %self.collection, dimension, "collection provisioned");
        Ok(())
    }

    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<()> {
        let count = points.len();
        let point_structs: Vec<PointStruct> = points
            .into_iter()
            .map(|point| {
                let payload: std::collections::HashMap<String, qdrant_client::qdrant::Value> =
                    serde_json::to_value(&point.payload)
                        .unwrap_or_default()
                        .as_object()
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(k, v)| (k, v.into()))
                        .collect();

                PointStruct::new(point.id, point.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, point_structs))
            .await
            .map_err(|e| PipelineError::IndexWrite(format!("failed to upsert points: {e}")))?;

        info!(collection = %self.collection, count, "points upserted");
        Ok(())
    }
}
