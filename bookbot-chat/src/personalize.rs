//! Learning-level content adaptation.
//!
//! Rewrites book content for a target learning level with the chat model.
//! Long content is split on paragraph boundaries (characters, not tokens)
//! so each model call stays within a safe size, then rejoined.

use std::sync::Arc;

use bookbot_model::{ChatMessage, ChatModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ChatError, Result};
use crate::prompt::LearningLevel;

const MAX_CHUNK_CHARS: usize = 3000;
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4000;

/// The result of adapting content to a learning level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedContent {
    pub original_content: String,
    pub personalized_content: String,
    pub learning_level: LearningLevel,
    /// Human-readable descriptions of the kinds of adjustment applied.
    pub adjustments_made: Vec<String>,
}

/// Adapts content to the reader's learning level.
pub struct PersonalizationService {
    model: Arc<dyn ChatModel>,
}

impl PersonalizationService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Adapt `content` for the given level. An unrecognized or missing level
    /// label resolves to intermediate.
    pub async fn personalize(
        &self,
        content: &str,
        learning_level: Option<&str>,
        chapter_context: Option<&str>,
        content_type: &str,
    ) -> Result<PersonalizedContent> {
        if content.trim().is_empty() {
            return Err(ChatError::InvalidInput("Content cannot be empty".into()));
        }
        let level = learning_level.map(LearningLevel::parse).unwrap_or_default();

        info!(chars = content.len(), ?level, "personalizing content");

        let personalized_content = if content.len() > MAX_CHUNK_CHARS {
            let pieces = split_on_paragraphs(content, MAX_CHUNK_CHARS);
            debug!(pieces = pieces.len(), "content exceeds chunk size, splitting");
            let mut adapted = Vec::with_capacity(pieces.len());
            for piece in &pieces {
                adapted.push(self.adapt_piece(piece, level, chapter_context, content_type).await?);
            }
            adapted.join("\n\n")
        } else {
            self.adapt_piece(content, level, chapter_context, content_type).await?
        };

        Ok(PersonalizedContent {
            original_content: content.to_string(),
            personalized_content,
            learning_level: level,
            adjustments_made: adjustments(level).into_iter().map(String::from).collect(),
        })
    }

    async fn adapt_piece(
        &self,
        content: &str,
        level: LearningLevel,
        chapter_context: Option<&str>,
        content_type: &str,
    ) -> Result<String> {
        let name = level.display_name();
        let chapter_line = chapter_context
            .map(|c| format!("CHAPTER CONTEXT: This content is from: {c}"))
            .unwrap_or_default();

        let system = format!(
            "You are an expert educator specializing in Physical AI, Robotics, and Computer Science.\n\
             \n\
             Your task: Adapt the following technical content for a {upper} level learner.\n\
             \n\
             LEARNING LEVEL: {name}\n\
             STYLE GUIDELINE: {style}\n\
             \n\
             IMPORTANT RULES:\n\
             1. Maintain all factual accuracy - do not change technical facts\n\
             2. Preserve markdown formatting (headers, lists, code blocks, etc.)\n\
             3. Keep the same overall structure and organization\n\
             4. Adjust terminology, examples, and depth to match learning level\n\
             5. {rules}\n\
             \n\
             {chapter_line}\n\
             CONTENT TYPE: {content_type}\n\
             \n\
             Provide ONLY the adapted content, no explanations or meta-commentary.",
            upper = name.to_uppercase(),
            style = level.instruction(),
            rules = level_rules(level),
        );
        let user = format!("Adapt this content for {name} level:\n\n{content}");

        let reply = self
            .model
            .complete(
                &[ChatMessage::system(system), ChatMessage::user(user)],
                TEMPERATURE,
                MAX_TOKENS,
            )
            .await
            .map_err(|e| ChatError::Upstream {
                service: "Personalization",
                message: e.to_string(),
            })?;

        Ok(reply.trim().to_string())
    }
}

fn level_rules(level: LearningLevel) -> &'static str {
    match level {
        LearningLevel::Beginner => {
            "- Replace jargon with simple everyday terms\n\
             - Add analogies comparing concepts to familiar things\n\
             - Include step-by-step explanations\n\
             - Focus on 'what it is' and 'why it matters'\n\
             - Use concrete examples from daily life"
        }
        LearningLevel::Intermediate => {
            "- Use technical terms but define them clearly\n\
             - Provide balanced explanations with both theory and practice\n\
             - Include examples that bridge basic and advanced concepts\n\
             - Explain 'how it works' with moderate depth\n\
             - Connect to related concepts learners may know"
        }
        LearningLevel::Advanced => {
            "- Use technical terminology without simplified definitions\n\
             - Dive deep into implementation details and algorithms\n\
             - Reference research papers and advanced topics\n\
             - Explain 'how to optimize' and 'when to use alternatives'\n\
             - Include mathematical formulations where relevant"
        }
    }
}

fn adjustments(level: LearningLevel) -> Vec<&'static str> {
    match level {
        LearningLevel::Beginner => vec![
            "Simplified technical jargon",
            "Added everyday analogies",
            "Included step-by-step explanations",
            "Focused on practical understanding",
        ],
        LearningLevel::Intermediate => vec![
            "Balanced technical depth with clarity",
            "Explained complex terms clearly",
            "Added practical examples",
            "Maintained moderate technical depth",
        ],
        LearningLevel::Advanced => vec![
            "Increased technical depth",
            "Added advanced concepts and details",
            "Included implementation specifics",
            "Referenced advanced topics",
        ],
    }
}

/// Greedy paragraph packing: paragraphs (blank-line separated) are appended
/// to the current piece until adding another would exceed `max_len`.
/// A single oversized paragraph becomes its own piece.
pub(crate) fn split_on_paragraphs(text: &str, max_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for para in text.split("\n\n") {
        if current.len() + para.len() + 2 > max_len && !current.is_empty() {
            pieces.push(current.trim().to_string());
            current = format!("{para}\n\n");
        } else {
            current.push_str(para);
            current.push_str("\n\n");
        }
    }
    if !current.trim().is_empty() {
        pieces.push(current.trim().to_string());
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookbot_model::MockChatModel;

    #[tokio::test]
    async fn empty_content_is_an_input_error() {
        let service = PersonalizationService::new(Arc::new(MockChatModel::new("x")));
        let err = service.personalize("   ", None, None, "section").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_level_falls_back_to_intermediate() {
        let service = PersonalizationService::new(Arc::new(MockChatModel::new("adapted")));
        let result = service
            .personalize("Some robotics content.", Some("wizard"), None, "section")
            .await
            .unwrap();
        assert_eq!(result.learning_level, LearningLevel::Intermediate);
        assert_eq!(result.personalized_content, "adapted");
        assert_eq!(result.adjustments_made.len(), 4);
    }

    #[tokio::test]
    async fn long_content_is_adapted_piecewise() {
        let mock = Arc::new(MockChatModel::new("adapted piece"));
        let service = PersonalizationService::new(mock.clone());

        let para = "word ".repeat(300).trim_end().to_string();
        let content = format!("{para}\n\n{para}\n\n{para}");
        assert!(content.len() > MAX_CHUNK_CHARS);

        let result = service
            .personalize(&content, Some("beginner"), Some("Chapter 3"), "full_chapter")
            .await
            .unwrap();

        assert!(mock.call_count() > 1);
        assert_eq!(
            result.personalized_content,
            vec!["adapted piece"; mock.call_count()].join("\n\n")
        );
    }

    #[tokio::test]
    async fn model_failure_propagates_as_upstream_error() {
        let service = PersonalizationService::new(Arc::new(MockChatModel::fail_with("down")));
        let err = service
            .personalize("content", None, None, "section")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Upstream { service: "Personalization", .. }));
    }

    #[test]
    fn paragraph_split_respects_bound_and_preserves_text() {
        let para = "p ".repeat(40).trim_end().to_string();
        let text = vec![para.clone(); 10].join("\n\n");
        let pieces = split_on_paragraphs(&text, 200);

        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(piece.len() <= 200);
        }
        assert_eq!(pieces.join("\n\n"), text);
    }
}
