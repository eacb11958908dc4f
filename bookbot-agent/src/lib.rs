//! # bookbot-agent
//!
//! Specialized subagents for the bookbot textbook assistant: a physics
//! calculator, a robotics-concept explainer, a static code checker, and a
//! knowledge-search passthrough, plus the keyword router that picks between
//! them.
//!
//! Every subagent returns the same [`AgentOutcome`] envelope. Bad input and
//! unanswerable requests are reported outcomes, never panics or `Err`s, so a
//! chat pipeline can always fall back gracefully.

pub mod calculator;
pub mod code_check;
pub mod explainer;
pub mod outcome;
pub mod router;
pub mod search;

pub use calculator::{CalculationAgent, CalculationKind, CalculationRequest, Parameters};
pub use code_check::{AnalysisKind, CodeAnalysisAgent, CodeAnalysisRequest, Language};
pub use explainer::{Audience, ExplanationAgent, ExplanationRequest};
pub use outcome::AgentOutcome;
pub use router::{AgentKind, SubagentRouter};
pub use search::{KnowledgeSearch, SearchAgent};
