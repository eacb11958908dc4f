//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements [`VectorStore`] using the
//! [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC. Only
//! available when the `qdrant` feature is enabled.

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use tracing::debug;

use crate::document::{Chunk, EmbeddedChunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Bound to one Qdrant collection with cosine distance. Chunk fields are
/// stored as a flat payload and read back verbatim.
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorStore {
    /// Create a store connecting to the given URL and collection name.
    pub fn new(url: &str, collection: impl Into<String>) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(map_err)?;
        Ok(Self { client, collection: collection.into() })
    }

    /// Create a store from an existing client.
    pub fn from_client(client: Qdrant, collection: impl Into<String>) -> Self {
        Self { client, collection: collection.into() }
    }
}

fn map_err(e: qdrant_client::QdrantError) -> RagError {
    RagError::VectorStoreError { backend: "qdrant".to_string(), message: e.to_string() }
}

/// Extract a string from a Qdrant payload value.
fn extract_string(value: Option<&QdrantValue>) -> String {
    match value.and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Extract an integer from a Qdrant payload value.
fn extract_integer(value: Option<&QdrantValue>) -> usize {
    match value.and_then(|v| v.kind.as_ref()) {
        Some(Kind::IntegerValue(n)) => usize::try_from(*n).unwrap_or(0),
        _ => 0,
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn create_collection(&self, dimensions: usize) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(map_err)?;
        if collections.collections.iter().any(|c| c.name == self.collection) {
            debug!(collection = %self.collection, "qdrant collection already exists");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(map_err)?;

        debug!(collection = %self.collection, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn delete_collection(&self) -> Result<()> {
        self.client.delete_collection(&self.collection).await.map_err(map_err)?;
        debug!(collection = %self.collection, "deleted qdrant collection");
        Ok(())
    }

    async fn upsert(&self, chunks: &[EmbeddedChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = chunks
            .iter()
            .map(|point| {
                let payload = Payload::try_from(json!({
                    "content": point.chunk.content,
                    "chapter": point.chunk.chapter,
                    "section": point.chunk.section,
                    "source_file": point.chunk.source_file,
                    "chunk_index": point.chunk.chunk_index,
                    "token_count": point.chunk.token_count,
                }))
                .unwrap_or_default();

                PointStruct::new(point.id.clone(), point.embedding.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(map_err)?;

        debug!(collection = %self.collection, count = chunks.len(), "upserted chunks to qdrant");
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        score_threshold: f32,
        chapter: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let mut builder =
            SearchPointsBuilder::new(&self.collection, embedding.to_vec(), limit as u64)
                .with_payload(true)
                .score_threshold(score_threshold);

        if let Some(chapter) = chapter {
            builder = builder.filter(Filter::must([Condition::matches(
                "chapter",
                chapter.to_string(),
            )]));
        }

        let response = self.client.search_points(builder).await.map_err(map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| SearchResult {
                chunk: Chunk {
                    content: extract_string(scored.payload.get("content")),
                    chapter: extract_string(scored.payload.get("chapter")),
                    section: extract_string(scored.payload.get("section")),
                    source_file: extract_string(scored.payload.get("source_file")),
                    chunk_index: extract_integer(scored.payload.get("chunk_index")),
                    token_count: extract_integer(scored.payload.get("token_count")),
                },
                score: scored.score,
            })
            .collect();

        Ok(results)
    }
}
