//! The chat orchestrator.
//!
//! Request flow: input validation, greeting short-circuit, subagent routing,
//! then the retrieval-augmented generation path. Constructed once at process
//! start and shared across request handlers.

use std::sync::Arc;

use async_trait::async_trait;
use bookbot_agent::{AgentOutcome, KnowledgeSearch, SubagentRouter};
use bookbot_model::ChatMessage;
use bookbot_rag::RetrievalService;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::generate::ResponseGenerator;
use crate::intent::{detect_intent, is_greeting, GREETING_ANSWER};
use crate::prompt::{Intent, LearningLevel};

/// An inbound chat turn. Conversation persistence is the caller's concern;
/// recent history travels with the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    pub question: String,
    /// Text the user selected in the book, if any.
    pub context_text: Option<String>,
    /// Explicit intent label; unset or unknown means inferred.
    pub intent: Option<String>,
    /// The user's learning level label; unknown resolves to intermediate.
    pub learning_level: Option<String>,
    /// Recent conversation turns, oldest first.
    pub history: Vec<ChatMessage>,
}

/// The answer to a chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    /// `"chapter/section"` citation labels, first-seen order.
    pub sources: Vec<String>,
    /// Whether the answer is grounded in book content.
    pub grounded: bool,
    /// Mean relevance of the retrieved chunks, `0.0` when none.
    pub relevance_score: f32,
}

impl ChatResponse {
    fn plain(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            grounded: false,
            relevance_score: 0.0,
        }
    }
}

/// [`KnowledgeSearch`] over the book corpus: retrieval plus generation with
/// the default template.
struct BookKnowledge {
    retrieval: Arc<RetrievalService>,
    generator: Arc<ResponseGenerator>,
}

#[async_trait]
impl KnowledgeSearch for BookKnowledge {
    async fn search(&self, query: &str) -> AgentOutcome {
        let retrieval = self.retrieval.retrieve(query, None).await;
        let answer = self
            .generator
            .generate(query, &retrieval, None, None, LearningLevel::default(), &[])
            .await;

        AgentOutcome::ok(answer.answer)
            .with_sources(answer.sources)
            .with_metadata(json!({
                "grounded": answer.grounded,
                "relevance_score": answer.relevance_score,
            }))
    }
}

/// Answers chat requests end to end.
pub struct ChatService {
    router: SubagentRouter,
    retrieval: Arc<RetrievalService>,
    generator: Arc<ResponseGenerator>,
}

impl ChatService {
    pub fn new(retrieval: Arc<RetrievalService>, generator: Arc<ResponseGenerator>) -> Self {
        let knowledge = BookKnowledge {
            retrieval: retrieval.clone(),
            generator: generator.clone(),
        };
        Self {
            router: SubagentRouter::new(Arc::new(knowledge)),
            retrieval,
            generator,
        }
    }

    /// Answer one chat turn.
    ///
    /// Input problems come back as [`ChatError::InvalidInput`]. Anything
    /// unexpected is logged under a fresh correlation id and mapped to
    /// [`ChatError::Internal`]; upstream model and retrieval failures never
    /// reach here because the pipeline degrades below this boundary.
    pub async fn answer(&self, request: &ChatRequest) -> Result<ChatResponse> {
        match self.process(request).await {
            Ok(response) => Ok(response),
            Err(e @ ChatError::InvalidInput(_)) => Err(e),
            Err(e) => {
                let correlation_id = Uuid::new_v4().to_string();
                error!(%correlation_id, error = %e, "chat request failed");
                Err(ChatError::Internal { correlation_id })
            }
        }
    }

    async fn process(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(ChatError::InvalidInput("Question cannot be empty".into()));
        }

        info!(question, "handling chat request");

        if is_greeting(question) {
            return Ok(ChatResponse::plain(GREETING_ANSWER));
        }

        if let Some(outcome) = self.router.route(question, None).await {
            if outcome.success {
                return Ok(self.outcome_response(outcome));
            }
            debug!(error = ?outcome.error, "subagent reported failure, falling back to retrieval");
        }

        let context_text = request.context_text.as_deref().filter(|t| !t.trim().is_empty());
        let intent = request
            .intent
            .as_deref()
            .and_then(Intent::parse)
            .or_else(|| detect_intent(question, context_text));
        let level = request
            .learning_level
            .as_deref()
            .map(LearningLevel::parse)
            .unwrap_or_default();

        let retrieval = self.retrieval.retrieve(question, None).await;
        let answer = self
            .generator
            .generate(question, &retrieval, context_text, intent, level, &request.history)
            .await;

        Ok(ChatResponse {
            answer: answer.answer,
            sources: answer.sources,
            grounded: answer.grounded,
            relevance_score: answer.relevance_score,
        })
    }

    fn outcome_response(&self, outcome: AgentOutcome) -> ChatResponse {
        let (grounded, relevance_score) = outcome
            .metadata
            .as_ref()
            .map(|m| {
                (
                    m.get("grounded").and_then(|v| v.as_bool()).unwrap_or(false),
                    m.get("relevance_score").and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
                )
            })
            .unwrap_or((false, 0.0));

        ChatResponse {
            answer: outcome.result.unwrap_or_default(),
            sources: outcome.sources.unwrap_or_default(),
            grounded,
            relevance_score,
        }
    }
}
