//! # bookbot-chat
//!
//! Chat orchestration for the bookbot textbook assistant.
//!
//! Ties the other crates together: prompt templates and intent detection,
//! the [`ResponseGenerator`] over retrieved book content, the [`ChatService`]
//! request pipeline (greeting short-circuit, subagent routing, then
//! retrieval-augmented generation), and the personalization and translation
//! services.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use bookbot_chat::{ChatRequest, ChatService, ResponseGenerator};
//! use bookbot_model::{GenerationConfig, OpenAIChatModel};
//! use bookbot_rag::{InMemoryVectorStore, OpenAIEmbeddingProvider, RagConfig, RetrievalService};
//!
//! let model = Arc::new(OpenAIChatModel::from_env("gpt-4o-mini")?);
//! let retrieval = Arc::new(RetrievalService::new(
//!     RagConfig::default(),
//!     Arc::new(OpenAIEmbeddingProvider::from_env()?),
//!     Arc::new(InMemoryVectorStore::new()),
//! ));
//! let generator = Arc::new(ResponseGenerator::new(model, GenerationConfig::default()));
//! let service = ChatService::new(retrieval, generator);
//!
//! let response = service
//!     .answer(&ChatRequest { question: "What is SLAM?".into(), ..Default::default() })
//!     .await?;
//! ```

pub mod error;
pub mod generate;
pub mod intent;
pub mod personalize;
pub mod prompt;
pub mod service;
pub mod translate;

pub use error::{ChatError, Result};
pub use generate::{ChatAnswer, ResponseGenerator, APOLOGY_ANSWER, GENERAL_KNOWLEDGE_NOTE};
pub use intent::{detect_intent, is_greeting, GREETING_ANSWER};
pub use personalize::{PersonalizationService, PersonalizedContent};
pub use prompt::{build_prompt, Intent, LearningLevel};
pub use service::{ChatRequest, ChatResponse, ChatService};
pub use translate::{TargetLanguage, Translation, TranslationService};
