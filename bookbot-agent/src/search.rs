//! Knowledge-base search passthrough.
//!
//! The actual retrieval-and-answer pipeline lives a crate above this one, so
//! the router takes it as an injected [`KnowledgeSearch`] implementation
//! rather than depending on it directly.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::outcome::{invalid_query_outcome, valid_query, AgentOutcome};

/// A searchable knowledge base the router can consult for general questions.
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    /// Answer a query from the knowledge base, with sources.
    async fn search(&self, query: &str) -> AgentOutcome;
}

/// The knowledge-search subagent: input validation plus delegation.
pub struct SearchAgent {
    backend: Arc<dyn KnowledgeSearch>,
}

impl SearchAgent {
    pub fn new(backend: Arc<dyn KnowledgeSearch>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, query: &str) -> AgentOutcome {
        if !valid_query(query) {
            return invalid_query_outcome();
        }
        debug!(query, "delegating to knowledge search");
        self.backend.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedSearch;

    #[async_trait]
    impl KnowledgeSearch for CannedSearch {
        async fn search(&self, _query: &str) -> AgentOutcome {
            AgentOutcome::ok("an answer").with_sources(vec!["ch1/intro".into()])
        }
    }

    #[tokio::test]
    async fn delegates_valid_queries() {
        let agent = SearchAgent::new(Arc::new(CannedSearch));
        let outcome = agent.execute("what is a robot?").await;
        assert!(outcome.success);
        assert_eq!(outcome.sources.unwrap(), vec!["ch1/intro".to_string()]);
    }

    #[tokio::test]
    async fn rejects_short_queries_without_delegating() {
        let agent = SearchAgent::new(Arc::new(CannedSearch));
        let outcome = agent.execute("ab").await;
        assert!(!outcome.success);
    }
}
