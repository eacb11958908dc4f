//! Error types for the `bookbot-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a chat-completion backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The provider rejected the configuration (missing key, bad model).
    #[error("Model configuration error: {0}")]
    ConfigError(String),

    /// The completion request failed in transit or at the API.
    #[error("Completion error ({provider}): {message}")]
    CompletionError {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
