//! Fail-soft retrieval over the book corpus.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::RagConfig;
use crate::document::RetrievalOutcome;
use crate::embedding::EmbeddingProvider;
use crate::vectorstore::VectorStore;

/// Turns a query into a ranked list of relevant chunks plus a groundedness flag.
///
/// Retrieval never fails the caller: embedding or search errors degrade to an
/// empty, ungrounded outcome and the chat layer answers from general
/// knowledge instead. Constructed once at process start and shared.
pub struct RetrievalService {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl RetrievalService {
    /// Create a retrieval service over the given embedder and store.
    pub fn new(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { config, embedding_provider, vector_store }
    }

    /// Return a reference to the retrieval configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Retrieve the chunks most relevant to `query`.
    ///
    /// Searches the store for the configured `top_k` nearest neighbours at or
    /// above the relevance threshold, optionally restricted to one chapter.
    /// The outcome is grounded iff the top result meets the threshold.
    pub async fn retrieve(&self, query: &str, chapter: Option<&str>) -> RetrievalOutcome {
        let embedding = match self.embedding_provider.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed, degrading to empty retrieval");
                return RetrievalOutcome::empty();
            }
        };

        let results = match self
            .vector_store
            .search(&embedding, self.config.top_k, self.config.relevance_threshold, chapter)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "vector search failed, degrading to empty retrieval");
                return RetrievalOutcome::empty();
            }
        };

        let is_grounded = results
            .first()
            .map_or(false, |top| top.score >= self.config.relevance_threshold);

        info!(result_count = results.len(), is_grounded, "retrieval completed");
        RetrievalOutcome { results, is_grounded }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chunk, EmbeddedChunk, SearchResult};
    use crate::error::{RagError, Result};
    use crate::inmemory::InMemoryVectorStore;
    use async_trait::async_trait;

    /// Embedder returning a fixed unit vector.
    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }

        fn dimensions(&self) -> usize {
            self.0.len()
        }
    }

    /// Store whose search always fails.
    struct BrokenStore;

    #[async_trait]
    impl VectorStore for BrokenStore {
        async fn create_collection(&self, _dimensions: usize) -> Result<()> {
            Ok(())
        }

        async fn delete_collection(&self) -> Result<()> {
            Ok(())
        }

        async fn upsert(&self, _chunks: &[EmbeddedChunk]) -> Result<()> {
            Ok(())
        }

        async fn search(
            &self,
            _embedding: &[f32],
            _limit: usize,
            _score_threshold: f32,
            _chapter: Option<&str>,
        ) -> Result<Vec<SearchResult>> {
            Err(RagError::VectorStoreError {
                backend: "broken".into(),
                message: "connection refused".into(),
            })
        }
    }

    fn point(id: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            id: id.to_string(),
            chunk: Chunk {
                content: "lidar content".into(),
                chapter: "robotics".into(),
                section: "sensors".into(),
                source_file: "ch02.md".into(),
                chunk_index: 0,
                token_count: 3,
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn failing_store_degrades_to_empty_outcome() {
        let service = RetrievalService::new(
            RagConfig::default(),
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            Arc::new(BrokenStore),
        );

        let outcome = service.retrieve("what is slam", None).await;
        assert!(outcome.results.is_empty());
        assert!(!outcome.is_grounded);
    }

    #[tokio::test]
    async fn grounded_iff_top_score_meets_threshold() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.upsert(&[point("a", vec![1.0, 0.0])]).await.unwrap();

        let config = RagConfig::builder().relevance_threshold(0.7).build().unwrap();

        // Identical direction: score 1.0, grounded.
        let service = RetrievalService::new(
            config.clone(),
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            store.clone(),
        );
        let outcome = service.retrieve("query", None).await;
        assert!(outcome.is_grounded);

        // Orthogonal direction: below threshold, filtered out, ungrounded.
        let service =
            RetrievalService::new(config, Arc::new(FixedEmbedder(vec![0.0, 1.0])), store);
        let outcome = service.retrieve("query", None).await;
        assert!(outcome.results.is_empty());
        assert!(!outcome.is_grounded);
    }

    #[tokio::test]
    async fn chapter_filter_is_passed_through() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.upsert(&[point("a", vec![1.0, 0.0])]).await.unwrap();

        let service = RetrievalService::new(
            RagConfig::default(),
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            store,
        );

        let outcome = service.retrieve("query", Some("another-chapter")).await;
        assert!(outcome.results.is_empty());
        assert!(!outcome.is_grounded);
    }
}
