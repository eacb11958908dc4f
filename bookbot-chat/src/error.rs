//! Error types for the `bookbot-chat` crate.

use thiserror::Error;

/// Errors surfaced by the chat, personalization, and translation services.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The caller sent something unusable (empty question, unsupported
    /// language). Reported verbatim; no side effects occurred.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An upstream model call failed in a service that does not degrade
    /// (personalization, translation).
    #[error("{service} error: {message}")]
    Upstream {
        /// Which service hit the failure.
        service: &'static str,
        /// A description of the failure.
        message: String,
    },

    /// An unexpected failure, already logged under the correlation id.
    #[error("An internal error occurred while processing your request (id: {correlation_id})")]
    Internal {
        /// Matches the id in the error log entry.
        correlation_id: String,
    },
}

/// A convenience result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
