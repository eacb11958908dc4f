//! Book-content translation.
//!
//! Translates technical content with the chat model into Urdu, Arabic,
//! Spanish, or French, preserving markdown when asked. Long text is split
//! on paragraph boundaries the same way personalization does.

use std::sync::Arc;

use bookbot_model::{ChatMessage, ChatModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ChatError, Result};
use crate::personalize::split_on_paragraphs;

const MAX_CHUNK_CHARS: usize = 2000;
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 3000;

/// The languages the service can translate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Ur,
    Ar,
    Es,
    Fr,
}

impl TargetLanguage {
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "ur" => Some(Self::Ur),
            "ar" => Some(Self::Ar),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ur => "Urdu",
            Self::Ar => "Arabic",
            Self::Es => "Spanish",
            Self::Fr => "French",
        }
    }

    /// Whether the language renders right-to-left.
    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Ur | Self::Ar)
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Ur => "ur",
            Self::Ar => "ar",
            Self::Es => "es",
            Self::Fr => "fr",
        }
    }
}

/// A completed translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: TargetLanguage,
    pub character_count: usize,
    /// Layout hint for the caller.
    pub is_rtl: bool,
}

/// Translates content via the chat model.
pub struct TranslationService {
    model: Arc<dyn ChatModel>,
}

impl TranslationService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Translate `text` into the language named by `target_code`.
    pub async fn translate(
        &self,
        text: &str,
        target_code: &str,
        source_language: &str,
        context: Option<&str>,
        preserve_formatting: bool,
    ) -> Result<Translation> {
        let target = TargetLanguage::parse(target_code).ok_or_else(|| {
            ChatError::InvalidInput(format!(
                "Unsupported language: {target_code}. Supported: ur, ar, es, fr"
            ))
        })?;
        if text.trim().is_empty() {
            return Err(ChatError::InvalidInput("Text cannot be empty".into()));
        }

        info!(
            chars = text.len(),
            from = source_language,
            to = target.code(),
            "translating content"
        );

        let translated_text = if text.len() > MAX_CHUNK_CHARS {
            let pieces = split_on_paragraphs(text, MAX_CHUNK_CHARS);
            debug!(pieces = pieces.len(), "text exceeds chunk size, splitting");
            let mut translated = Vec::with_capacity(pieces.len());
            for piece in &pieces {
                translated.push(
                    self.translate_piece(piece, target, source_language, context, preserve_formatting)
                        .await?,
                );
            }
            translated.join("\n\n")
        } else {
            self.translate_piece(text, target, source_language, context, preserve_formatting)
                .await?
        };

        Ok(Translation {
            original_text: text.to_string(),
            translated_text,
            source_language: source_language.to_string(),
            target_language: target,
            character_count: text.len(),
            is_rtl: target.is_rtl(),
        })
    }

    async fn translate_piece(
        &self,
        text: &str,
        target: TargetLanguage,
        source_language: &str,
        context: Option<&str>,
        preserve_formatting: bool,
    ) -> Result<String> {
        let language_name = target.name();
        let formatting_rule = if preserve_formatting {
            "Preserve markdown formatting (headers, lists, code blocks, etc.)"
        } else {
            "Plain text output only"
        };
        let context_line = context
            .map(|c| format!("CONTEXT: This content is from a chapter about: {c}"))
            .unwrap_or_default();

        let system = format!(
            "You are an expert translator specializing in technical content about Physical AI, Robotics, and Computer Science.\n\
             \n\
             Your task: Translate the following text from {source} to {language_name}.\n\
             \n\
             IMPORTANT RULES:\n\
             1. Maintain technical accuracy - preserve technical terms where appropriate\n\
             2. Keep the same tone and style\n\
             3. {formatting_rule}\n\
             4. Make the translation natural and fluent in {language_name}\n\
             5. For technical terms without common {language_name} equivalents, use the \
             English term followed by {language_name} explanation in parentheses\n\
             6. Maintain paragraph structure and line breaks\n\
             \n\
             {context_line}\n\
             \n\
             Provide ONLY the translation, no explanations or notes.",
            source = source_language.to_uppercase(),
        );
        let user = format!("Translate this text to {language_name}:\n\n{text}");

        let reply = self
            .model
            .complete(
                &[ChatMessage::system(system), ChatMessage::user(user)],
                TEMPERATURE,
                MAX_TOKENS,
            )
            .await
            .map_err(|e| ChatError::Upstream {
                service: "Translation",
                message: e.to_string(),
            })?;

        Ok(reply.trim().to_string())
    }
}
