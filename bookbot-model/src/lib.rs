//! # bookbot-model
//!
//! Chat-completion model integrations for the bookbot textbook assistant.
//!
//! Provides the [`ChatModel`] trait plus:
//!
//! - [`OpenAIChatModel`] — OpenAI `/v1/chat/completions` and compatible
//!   gateways (OpenRouter, vLLM, Ollama) via a custom base URL
//! - [`MockChatModel`] — canned replies or injected failures for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use bookbot_model::{ChatMessage, ChatModel, OpenAIChatModel, Role};
//!
//! let model = OpenAIChatModel::from_env("gpt-4o-mini")?;
//! let answer = model
//!     .complete(&[ChatMessage::new(Role::User, "What is SLAM?")], 0.7, 800)
//!     .await?;
//! ```

pub mod chat;
pub mod error;
pub mod mock;
pub mod openai;

pub use chat::{ChatMessage, ChatModel, GenerationConfig, Role};
pub use error::{ModelError, Result};
pub use mock::MockChatModel;
pub use openai::OpenAIChatModel;
