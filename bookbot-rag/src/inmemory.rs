//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] backs a collection with a `HashMap` behind a
//! `tokio::sync::RwLock`. Suitable for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{EmbeddedChunk, SearchResult};
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// An in-memory [`VectorStore`] using cosine similarity for search.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    points: RwLock<HashMap<String, EmbeddedChunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, _dimensions: usize) -> Result<()> {
        Ok(())
    }

    async fn delete_collection(&self) -> Result<()> {
        self.points.write().await.clear();
        Ok(())
    }

    async fn upsert(&self, chunks: &[EmbeddedChunk]) -> Result<()> {
        let mut points = self.points.write().await;
        for chunk in chunks {
            points.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        score_threshold: f32,
        chapter: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let points = self.points.read().await;

        let mut scored: Vec<SearchResult> = points
            .values()
            .filter(|p| chapter.map_or(true, |c| p.chunk.chapter == c))
            .map(|p| SearchResult {
                chunk: p.chunk.clone(),
                score: cosine_similarity(&p.embedding, embedding),
            })
            .filter(|r| r.score >= score_threshold)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn point(id: &str, chapter: &str, section: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            id: id.to_string(),
            chunk: Chunk {
                content: format!("content of {id}"),
                chapter: chapter.to_string(),
                section: section.to_string(),
                source_file: "test.md".to_string(),
                chunk_index: 0,
                token_count: 3,
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn search_filters_by_threshold() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                point("a", "ch1", "s1", vec![1.0, 0.0]),
                point("b", "ch1", "s2", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 10, 0.5, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.section, "s1");
        assert!(results[0].score > 0.99);
    }

    #[tokio::test]
    async fn search_filters_by_chapter() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                point("a", "ch1", "s1", vec![1.0, 0.0]),
                point("b", "ch2", "s1", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 10, 0.0, Some("ch2")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.chapter, "ch2");
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[point("a", "ch1", "s1", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(&[point("a", "ch1", "s2", vec![1.0, 0.0])]).await.unwrap();

        let results = store.search(&[1.0, 0.0], 10, 0.0, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.section, "s2");
    }

    #[tokio::test]
    async fn delete_collection_clears_points() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[point("a", "ch1", "s1", vec![1.0, 0.0])]).await.unwrap();
        store.delete_collection().await.unwrap();
        let results = store.search(&[1.0, 0.0], 10, 0.0, None).await.unwrap();
        assert!(results.is_empty());
    }
}
