//! Ingestion pipeline: chunk → embed → store.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::chunking::MarkdownChunker;
use crate::document::{EmbeddedChunk, SectionMeta};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Ingests book content into the vector store.
///
/// Unlike retrieval, ingestion is operator-facing: failures propagate so the
/// caller can abort and retry a batch instead of silently losing chunks.
pub struct Ingestor {
    chunker: MarkdownChunker,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl Ingestor {
    /// Create an ingestor over the given chunker, embedder, and store.
    pub fn new(
        chunker: MarkdownChunker,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { chunker, embedding_provider, vector_store }
    }

    /// Create the backing collection sized for the embedding provider.
    pub async fn create_collection(&self) -> Result<()> {
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(dimensions).await
    }

    /// Ingest one document: chunk, embed in batch, upsert under fresh IDs.
    ///
    /// Returns the number of chunks stored. An empty document stores nothing.
    pub async fn ingest(&self, content: &str, meta: &SectionMeta) -> Result<usize> {
        let chunks = self.chunker.chunk(content, meta);
        if chunks.is_empty() {
            info!(source_file = %meta.source_file, chunk_count = 0, "ingested document (empty)");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(source_file = %meta.source_file, error = %e, "embedding failed during ingestion");
            RagError::IngestError(format!("embedding failed for '{}': {e}", meta.source_file))
        })?;

        let points: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk {
                id: Uuid::new_v4().to_string(),
                chunk,
                embedding,
            })
            .collect();

        self.vector_store.upsert(&points).await.map_err(|e| {
            error!(source_file = %meta.source_file, error = %e, "upsert failed during ingestion");
            RagError::IngestError(format!("upsert failed for '{}': {e}", meta.source_file))
        })?;

        info!(source_file = %meta.source_file, chunk_count = points.len(), "ingested document");
        Ok(points.len())
    }
}
