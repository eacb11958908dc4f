//! A mock chat model for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{ChatMessage, ChatModel};
use crate::error::{ModelError, Result};

/// A [`ChatModel`] that returns canned replies and records every call.
///
/// Replies are consumed in order; once exhausted the last reply repeats.
/// With `fail_with` set, every call returns a completion error instead.
pub struct MockChatModel {
    replies: Mutex<Vec<String>>,
    failure: Option<String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    /// Create a mock that always returns `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(vec![reply.into()]),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns `replies` in order, repeating the last.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self { replies: Mutex::new(replies), failure: None, calls: Mutex::new(Vec::new()) }
    }

    /// Create a mock where every call fails with the given message.
    pub fn fail_with(message: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            failure: Some(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The message lists passed to [`ChatModel::complete`] so far.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times [`ChatModel::complete`] has been called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());

        if let Some(message) = &self.failure {
            return Err(ModelError::CompletionError {
                provider: "mock".into(),
                message: message.clone(),
            });
        }

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ModelError::CompletionError {
                provider: "mock".into(),
                message: "no replies configured".into(),
            });
        }
        if replies.len() > 1 {
            Ok(replies.remove(0))
        } else {
            Ok(replies[0].clone())
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
