//! The uniform subagent result envelope.

use serde::{Deserialize, Serialize};

/// The result of running a subagent.
///
/// Subagents never return `Err`: bad input and missing parameters are
/// reported outcomes with `success: false`, so callers always get a value
/// they can render or fall back from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutcome {
    /// Whether the agent produced a usable result.
    pub success: bool,
    /// The answer text, when successful.
    pub result: Option<String>,
    /// A description of what went wrong, when unsuccessful.
    pub error: Option<String>,
    /// Source labels backing the answer, when the agent consulted content.
    pub sources: Option<Vec<String>>,
    /// Free-form extra data.
    pub metadata: Option<serde_json::Value>,
}

impl AgentOutcome {
    /// A successful outcome with the given result text.
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(result.into()),
            error: None,
            sources: None,
            metadata: None,
        }
    }

    /// A failed outcome with the given error message.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            sources: None,
            metadata: None,
        }
    }

    /// Attach source labels to the outcome.
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = if sources.is_empty() { None } else { Some(sources) };
        self
    }

    /// Attach metadata to the outcome.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Shared input gate: queries must have at least 3 non-whitespace-trimmed
/// characters.
pub(crate) fn valid_query(query: &str) -> bool {
    query.trim().len() >= 3
}

/// The outcome every handler returns for a query that fails [`valid_query`].
pub(crate) fn invalid_query_outcome() -> AgentOutcome {
    AgentOutcome::err("Invalid query: query must be at least 3 characters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_sets_result_only() {
        let outcome = AgentOutcome::ok("42");
        assert!(outcome.success);
        assert_eq!(outcome.result.as_deref(), Some("42"));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn empty_sources_stay_none() {
        let outcome = AgentOutcome::ok("x").with_sources(vec![]);
        assert!(outcome.sources.is_none());
    }

    #[test]
    fn query_gate_trims_whitespace() {
        assert!(valid_query("abc"));
        assert!(!valid_query("  ab  "));
        assert!(!valid_query("   "));
        assert!(!valid_query(""));
    }
}
