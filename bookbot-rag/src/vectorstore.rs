//! Vector store trait for storing and searching embedded chunks.

use async_trait::async_trait;

use crate::document::{EmbeddedChunk, SearchResult};
use crate::error::Result;

/// A storage backend holding one named collection of embedded book chunks.
///
/// Each store instance is bound to a single collection for its lifetime.
/// Implementations persist the five chunk payload fields (`content`,
/// `chapter`, `section`, `source_file`, `chunk_index`) verbatim and return
/// them unchanged in search results.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection with the given vector dimensionality.
    /// No-op if it already exists.
    async fn create_collection(&self, dimensions: usize) -> Result<()>;

    /// Delete the collection and all its data.
    async fn delete_collection(&self) -> Result<()>;

    /// Upsert embedded chunks into the collection.
    async fn upsert(&self, chunks: &[EmbeddedChunk]) -> Result<()>;

    /// Search for the `limit` most similar chunks to `embedding`.
    ///
    /// Results are ordered by descending cosine similarity, restricted to
    /// `score >= score_threshold` and, when `chapter` is given, to chunks
    /// whose chapter field matches it exactly.
    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        score_threshold: f32,
        chapter: Option<&str>,
    ) -> Result<Vec<SearchResult>>;
}
