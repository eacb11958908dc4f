//! # bookbot-rag
//!
//! Retrieval layer for the bookbot textbook assistant.
//!
//! This crate turns book content into token-bounded chunks, embeds them, and
//! answers nearest-neighbour queries over a vector store:
//!
//! - [`MarkdownChunker`] — heading/paragraph-aware chunking with overlap
//! - [`EmbeddingProvider`] — embedding trait, with an OpenAI implementation
//!   behind the `openai` feature
//! - [`VectorStore`] — collection-bound store trait, with [`InMemoryVectorStore`]
//!   and a Qdrant backend behind the `qdrant` feature
//! - [`Ingestor`] — chunk → embed → upsert workflow
//! - [`RetrievalService`] — fail-soft query → ranked chunks + groundedness
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bookbot_rag::{
//!     InMemoryVectorStore, MarkdownChunker, RagConfig, RetrievalService, TokenCounter,
//! };
//!
//! let store = Arc::new(InMemoryVectorStore::new());
//! let service = RetrievalService::new(RagConfig::default(), embedder, store);
//! let outcome = service.retrieve("What is SLAM?", None).await;
//! if outcome.is_grounded {
//!     // answer from the book
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod inmemory;
#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod retrieval;
pub mod tokenize;
pub mod vectorstore;

pub use chunking::MarkdownChunker;
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, EmbeddedChunk, RetrievalOutcome, SearchResult, SectionMeta};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use ingest::Ingestor;
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
pub use retrieval::RetrievalService;
pub use tokenize::TokenCounter;
pub use vectorstore::VectorStore;
