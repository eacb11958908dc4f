//! Data types for chunks, search results, and retrieval outcomes.

use serde::{Deserialize, Serialize};

/// A bounded segment of book content with its provenance metadata.
///
/// Chunks are produced by the [`MarkdownChunker`](crate::chunking::MarkdownChunker)
/// and are immutable once created. The five metadata fields are exactly the
/// payload schema the vector store persists and returns verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub content: String,
    /// Chapter label the chunk belongs to.
    pub chapter: String,
    /// Section label (heading) the chunk belongs to.
    pub section: String,
    /// Source file the content was ingested from.
    pub source_file: String,
    /// Position of this chunk within its ingestion batch.
    pub chunk_index: usize,
    /// Token count of `content` as measured at chunking time.
    pub token_count: usize,
}

/// Document-level metadata attached to every chunk produced from one source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SectionMeta {
    /// Chapter label, e.g. `"robotics"`.
    pub chapter: String,
    /// Default section label, overridden per chunk by markdown headings.
    pub section: String,
    /// Originating file path or name.
    pub source_file: String,
}

/// A [`Chunk`] paired with its embedding vector, keyed by a generated ID.
///
/// Created at ingestion time and stored in the vector store. Never mutated,
/// only deleted or replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedChunk {
    /// Unique identifier (UUID v4 generated at ingestion).
    pub id: String,
    /// The underlying chunk.
    pub chunk: Chunk,
    /// The embedding vector for the chunk's content.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a similarity score in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity against the query (higher is more relevant).
    pub score: f32,
}

impl SearchResult {
    /// The `"{chapter}/{section}"` citation label for this result.
    pub fn source_label(&self) -> String {
        format!("{}/{}", self.chunk.chapter, self.chunk.section)
    }
}

/// The outcome of a retrieval pass over the book corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    /// Retrieved chunks ordered by descending score.
    pub results: Vec<SearchResult>,
    /// True iff results are non-empty and the top score meets the
    /// relevance threshold. A false value means the answer will be
    /// drawn from general knowledge instead of the corpus.
    pub is_grounded: bool,
}

impl RetrievalOutcome {
    /// An empty, ungrounded outcome. Used when retrieval degrades.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Arithmetic mean of the result scores, `0.0` when empty.
    pub fn mean_score(&self) -> f32 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.results.iter().map(|r| r.score).sum::<f32>() / self.results.len() as f32
    }
}
