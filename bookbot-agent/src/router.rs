//! Keyword routing of queries to subagents.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculator::{CalculationAgent, CalculationRequest};
use crate::code_check::{CodeAnalysisAgent, CodeAnalysisRequest};
use crate::explainer::{Audience, ExplanationAgent, ExplanationRequest};
use crate::outcome::AgentOutcome;
use crate::search::{KnowledgeSearch, SearchAgent};

/// The subagents the router can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Calculation,
    Explanation,
    CodeAnalysis,
    KnowledgeSearch,
}

const CALCULATION_KEYWORDS: &[&str] = &[
    "calculate",
    "compute",
    "torque",
    "velocity",
    "acceleration",
    "force",
    "power",
    "energy",
    "momentum",
    "kinematics",
    "dynamics",
];

const EXPLANATION_KEYWORDS: &[&str] = &[
    "explain",
    "what is",
    "what's",
    "definition",
    "define",
    "concept",
    "how does",
    "principle",
];

const CODE_KEYWORDS: &[&str] =
    &["code", "function", "algorithm", "implement", "error", "debug", "optimiz"];

const GENERAL_KEYWORDS: &[&str] =
    &["what", "how", "when", "where", "why", "information", "tell me"];

/// Routes queries to the specialized subagents.
///
/// Keyword scan runs in fixed priority order: calculation, then explanation,
/// then code, then general questions. First hit wins, so a query like
/// "explain how to calculate torque" lands on the calculator. Queries with
/// no keyword hit return `None` and the caller falls back to plain
/// retrieval-augmented generation.
pub struct SubagentRouter {
    calculation: CalculationAgent,
    explanation: ExplanationAgent,
    code: CodeAnalysisAgent,
    search: SearchAgent,
}

impl SubagentRouter {
    pub fn new(knowledge: Arc<dyn KnowledgeSearch>) -> Self {
        Self {
            calculation: CalculationAgent::new(),
            explanation: ExplanationAgent::new(),
            code: CodeAnalysisAgent::new(),
            search: SearchAgent::new(knowledge),
        }
    }

    /// Route a query. An explicit kind dispatches directly with default
    /// request settings; otherwise the keyword scan decides.
    pub async fn route(&self, query: &str, explicit: Option<AgentKind>) -> Option<AgentOutcome> {
        let kind = match explicit {
            Some(kind) => kind,
            None => match self.detect(query) {
                Some(kind) => kind,
                None => {
                    debug!(query, "no subagent matched");
                    return None;
                }
            },
        };

        info!(query, ?kind, "routing to subagent");
        Some(self.dispatch(kind, query).await)
    }

    fn detect(&self, query: &str) -> Option<AgentKind> {
        let query = query.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|kw| query.contains(kw));

        if hit(CALCULATION_KEYWORDS) {
            Some(AgentKind::Calculation)
        } else if hit(EXPLANATION_KEYWORDS) {
            Some(AgentKind::Explanation)
        } else if hit(CODE_KEYWORDS) {
            Some(AgentKind::CodeAnalysis)
        } else if hit(GENERAL_KEYWORDS) {
            Some(AgentKind::KnowledgeSearch)
        } else {
            None
        }
    }

    async fn dispatch(&self, kind: AgentKind, query: &str) -> AgentOutcome {
        match kind {
            AgentKind::Calculation => self.calculate(query, None),
            AgentKind::Explanation => self.explanation.execute(
                query,
                Some(&ExplanationRequest {
                    concept: query.to_string(),
                    audience: Audience::Intermediate,
                    include_examples: true,
                }),
            ),
            AgentKind::CodeAnalysis => self.analyze_code(
                query,
                &CodeAnalysisRequest {
                    code: None,
                    language: "python".into(),
                    analysis_type: "error_check".into(),
                },
            ),
            AgentKind::KnowledgeSearch => self.search.execute(query).await,
        }
    }

    /// Run the calculator directly, optionally with typed parameters.
    pub fn calculate(&self, query: &str, request: Option<&CalculationRequest>) -> AgentOutcome {
        self.calculation.execute(query, request)
    }

    /// Run the explainer directly.
    pub fn explain(&self, query: &str, request: &ExplanationRequest) -> AgentOutcome {
        self.explanation.execute(query, Some(request))
    }

    /// Run the code checker directly.
    pub fn analyze_code(&self, query: &str, request: &CodeAnalysisRequest) -> AgentOutcome {
        self.code.execute(query, Some(request))
    }
}
