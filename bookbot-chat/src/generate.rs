//! Answer generation over retrieved context.

use std::sync::Arc;

use bookbot_model::{ChatMessage, ChatModel, GenerationConfig};
use bookbot_rag::RetrievalOutcome;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::prompt::{build_prompt, Intent, LearningLevel};

/// Appended when the answer is not grounded in retrieved book content.
pub const GENERAL_KNOWLEDGE_NOTE: &str = "\n\n*Note: This answer is based on general \
knowledge as no highly relevant content was found in the book.*";

/// Returned verbatim when the model call fails.
pub const APOLOGY_ANSWER: &str = "I apologize, but I encountered an error processing \
your question. Please try again.";

/// A generated answer with its citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswer {
    /// The answer text, possibly carrying the general-knowledge note.
    pub answer: String,
    /// Deduplicated `"chapter/section"` labels in first-seen order.
    pub sources: Vec<String>,
    /// Whether the answer is grounded in book content.
    pub grounded: bool,
    /// Mean similarity score of the retrieved chunks, `0.0` when none.
    pub relevance_score: f32,
}

/// Turns a question plus retrieval outcome into a final answer.
///
/// Fail-soft: a model failure produces the fixed apology answer with no
/// sources rather than an error, so one bad completion never takes down a
/// conversation.
pub struct ResponseGenerator {
    model: Arc<dyn ChatModel>,
    config: GenerationConfig,
}

impl ResponseGenerator {
    pub fn new(model: Arc<dyn ChatModel>, config: GenerationConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate an answer for `query` against the retrieved context.
    ///
    /// `history` is trimmed to the last `history_limit` entries before the
    /// prompt is appended as the final user turn.
    pub async fn generate(
        &self,
        query: &str,
        retrieval: &RetrievalOutcome,
        selected_text: Option<&str>,
        intent: Option<Intent>,
        level: LearningLevel,
        history: &[ChatMessage],
    ) -> ChatAnswer {
        let prompt = build_prompt(query, &retrieval.results, selected_text, intent, level);

        let tail_start = history.len().saturating_sub(self.config.history_limit);
        let mut messages: Vec<ChatMessage> = history[tail_start..].to_vec();
        messages.push(ChatMessage::user(prompt));

        let completion = self
            .model
            .complete(&messages, self.config.temperature, self.config.max_tokens)
            .await;

        let mut answer = match completion {
            Ok(text) => text,
            Err(e) => {
                error!(model = self.model.name(), error = %e, "completion failed");
                return ChatAnswer {
                    answer: APOLOGY_ANSWER.to_string(),
                    sources: Vec::new(),
                    grounded: false,
                    relevance_score: 0.0,
                };
            }
        };

        let mut sources: Vec<String> = Vec::new();
        for result in &retrieval.results {
            let label = result.source_label();
            if !sources.contains(&label) {
                sources.push(label);
            }
        }

        if !retrieval.is_grounded {
            answer.push_str(GENERAL_KNOWLEDGE_NOTE);
        }

        let relevance_score = retrieval.mean_score();
        info!(
            grounded = retrieval.is_grounded,
            relevance = relevance_score,
            source_count = sources.len(),
            "generated answer"
        );

        ChatAnswer {
            answer,
            sources,
            grounded: retrieval.is_grounded,
            relevance_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookbot_model::MockChatModel;
    use bookbot_rag::{Chunk, SearchResult};

    fn result(chapter: &str, section: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                content: "some content".into(),
                chapter: chapter.into(),
                section: section.into(),
                source_file: "f.md".into(),
                chunk_index: 0,
                token_count: 5,
            },
            score,
        }
    }

    fn generator(model: MockChatModel) -> ResponseGenerator {
        ResponseGenerator::new(Arc::new(model), GenerationConfig::default())
    }

    #[tokio::test]
    async fn grounded_answer_has_no_note_and_first_seen_sources() {
        let retrieval = RetrievalOutcome {
            results: vec![
                result("ch1", "intro", 0.9),
                result("ch2", "slam", 0.8),
                result("ch1", "intro", 0.7),
            ],
            is_grounded: true,
        };

        let answer = generator(MockChatModel::new("An answer."))
            .generate("q", &retrieval, None, None, LearningLevel::Intermediate, &[])
            .await;

        assert_eq!(answer.answer, "An answer.");
        assert_eq!(answer.sources, vec!["ch1/intro".to_string(), "ch2/slam".to_string()]);
        assert!(answer.grounded);
        assert!((answer.relevance_score - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn ungrounded_answer_carries_the_note() {
        let retrieval = RetrievalOutcome::empty();
        let answer = generator(MockChatModel::new("General wisdom."))
            .generate("q", &retrieval, None, None, LearningLevel::Intermediate, &[])
            .await;

        assert!(answer.answer.starts_with("General wisdom."));
        assert!(answer.answer.ends_with("found in the book.*"));
        assert!(!answer.grounded);
        assert_eq!(answer.relevance_score, 0.0);
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn model_failure_yields_apology() {
        let retrieval = RetrievalOutcome {
            results: vec![result("ch1", "intro", 0.9)],
            is_grounded: true,
        };
        let answer = generator(MockChatModel::fail_with("boom"))
            .generate("q", &retrieval, None, None, LearningLevel::Intermediate, &[])
            .await;

        assert_eq!(answer.answer, APOLOGY_ANSWER);
        assert!(answer.sources.is_empty());
        assert_eq!(answer.relevance_score, 0.0);
    }

    #[tokio::test]
    async fn history_is_trimmed_to_the_last_six() {
        let mock = Arc::new(MockChatModel::new("ok"));
        let history: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::user(format!("turn {i}")))
            .collect();

        let generator = ResponseGenerator::new(mock.clone(), GenerationConfig::default());
        generator
            .generate(
                "q",
                &RetrievalOutcome::empty(),
                None,
                None,
                LearningLevel::Intermediate,
                &history,
            )
            .await;

        let calls = mock.calls();
        // 6 history entries plus the prompt itself.
        assert_eq!(calls[0].len(), 7);
        assert_eq!(calls[0][0].content, "turn 4");
        assert_eq!(calls[0][5].content, "turn 9");
    }
}
