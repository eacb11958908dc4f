//! Prompt templates for the chat pipeline.
//!
//! A pure string builder: the same query, context, intent, and level always
//! produce the same prompt. Each intent has its own template; the context
//! block cites every retrieved chunk as `[Source N - chapter/section]`.

use bookbot_rag::SearchResult;
use serde::{Deserialize, Serialize};

/// What the user wants done with the selected text or question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Summarize,
    Explain,
    Keypoints,
    Mindmap,
    Simplify,
    Brief,
    Elaborate,
}

impl Intent {
    /// Parse an intent label; unknown labels mean "no specific intent".
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "summarize" => Some(Self::Summarize),
            "explain" => Some(Self::Explain),
            "keypoints" => Some(Self::Keypoints),
            "mindmap" => Some(Self::Mindmap),
            "simplify" => Some(Self::Simplify),
            "brief" => Some(Self::Brief),
            "elaborate" => Some(Self::Elaborate),
            _ => None,
        }
    }
}

/// The reader's self-reported expertise. Unrecognized labels resolve to
/// intermediate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl LearningLevel {
    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "advanced" => Self::Advanced,
            _ => Self::Intermediate,
        }
    }

    /// Display name, capitalized for prompt interpolation.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// The per-level style instruction injected into prompts.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Beginner => {
                "Explain in very simple terms, avoiding jargon. Use everyday \
                 analogies and examples."
            }
            Self::Intermediate => {
                "Use technical terms but explain them clearly. Balance depth \
                 with clarity."
            }
            Self::Advanced => {
                "Use technical terminology freely. Provide in-depth \
                 explanations with advanced concepts."
            }
        }
    }
}

/// Render the retrieved chunks as a cited context block. Empty when there
/// are no results.
fn context_block(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }
    let mut block = String::from("**Relevant content from the book:**\n\n");
    for (i, result) in results.iter().enumerate() {
        block.push_str(&format!(
            "[Source {} - {}]\n{}\n\n",
            i + 1,
            result.source_label(),
            result.chunk.content
        ));
    }
    block
}

fn quoted(label: &str, selected_text: Option<&str>) -> String {
    match selected_text {
        Some(text) => format!("{label}: \"{text}\""),
        None => String::new(),
    }
}

/// Build the full LLM prompt for a question.
pub fn build_prompt(
    query: &str,
    results: &[SearchResult],
    selected_text: Option<&str>,
    intent: Option<Intent>,
    level: LearningLevel,
) -> String {
    let level_name = level.display_name();
    let hint = level.instruction();
    let context = context_block(results);

    match intent {
        Some(Intent::Summarize) => match selected_text {
            Some(selected) => format!(
                "You are an AI assistant helping students learn about Physical AI and Robotics.\n\
                 \n\
                 User Learning Level: {level_name}\n\
                 Instruction: {hint}\n\
                 \n\
                 User selected this text:\n\
                 \"\"\"{selected}\"\"\"\n\
                 \n\
                 {context}\n\
                 \n\
                 Please provide a concise summary of the selected text in 2-3 sentences, \
                 focusing on the key concepts."
            ),
            None => format!(
                "{context}\n\
                 \n\
                 User Learning Level: {level_name}\n\
                 Instruction: {hint}\n\
                 \n\
                 Question: {query}\n\
                 \n\
                 Please provide a concise summary in 2-3 sentences."
            ),
        },
        Some(Intent::Explain) => format!(
            "You are an AI assistant helping students learn about Physical AI and Robotics.\n\
             \n\
             User Learning Level: {level_name}\n\
             Instruction: {hint}\n\
             \n\
             {context}\n\
             \n\
             {selected}\n\
             \n\
             Question: {query}\n\
             \n\
             Please explain this concept accordingly.",
            selected = quoted("User selected", selected_text),
        ),
        Some(Intent::Keypoints) => format!(
            "You are an AI assistant helping students learn about Physical AI and Robotics.\n\
             \n\
             User Learning Level: {level_name}\n\
             Instruction: {hint}\n\
             \n\
             {context}\n\
             \n\
             {selected}\n\
             \n\
             Question: {query}\n\
             \n\
             Please extract and list the key points in bullet format.",
            selected = quoted("Content", selected_text),
        ),
        Some(Intent::Mindmap) => format!(
            "You are an AI assistant helping students learn about Physical AI and Robotics.\n\
             \n\
             User Learning Level: {level_name}\n\
             \n\
             {context}\n\
             \n\
             {selected}\n\
             \n\
             Question: {query}\n\
             \n\
             Please create a text-based mind map showing the main concept and its \
             sub-concepts in a hierarchical structure.",
            selected = quoted("Topic", selected_text),
        ),
        Some(Intent::Simplify) => format!(
            "You are an AI assistant helping students learn about Physical AI and Robotics.\n\
             \n\
             User Learning Level: {level_name}\n\
             \n\
             {context}\n\
             \n\
             {selected}\n\
             \n\
             Question: {query}\n\
             \n\
             Please simplify this text to make it easier to understand. Use everyday \
             language, avoid jargon, and provide simple analogies.",
            selected = quoted("Complex text", selected_text),
        ),
        Some(Intent::Brief) => format!(
            "You are an AI assistant helping students learn about Physical AI and Robotics.\n\
             \n\
             User Learning Level: {level_name}\n\
             \n\
             {context}\n\
             \n\
             {selected}\n\
             \n\
             Question: {query}\n\
             \n\
             Please provide a VERY BRIEF answer (1-2 sentences maximum). Be concise \
             and to the point.",
            selected = quoted("Content", selected_text),
        ),
        Some(Intent::Elaborate) => format!(
            "You are an AI assistant helping students learn about Physical AI and Robotics.\n\
             \n\
             User Learning Level: {level_name}\n\
             Instruction: {hint}\n\
             \n\
             {context}\n\
             \n\
             {selected}\n\
             \n\
             Question: {query}\n\
             \n\
             Please elaborate on this topic with more details, examples, and deeper \
             explanations. Provide comprehensive information.",
            selected = quoted("Topic", selected_text),
        ),
        None => format!(
            "You are an AI assistant helping students learn about Physical AI and Humanoid Robotics.\n\
             \n\
             User Learning Level: {level_name}\n\
             Instruction: {hint}\n\
             \n\
             {context}\n\
             \n\
             {selected}\n\
             \n\
             Question: {query}\n\
             \n\
             Please provide a helpful, accurate answer. If the answer is in the \
             provided book content, cite the source.",
            selected = quoted("User context", selected_text),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookbot_rag::Chunk;

    fn result(chapter: &str, section: &str, content: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                content: content.into(),
                chapter: chapter.into(),
                section: section.into(),
                source_file: "test.md".into(),
                chunk_index: 0,
                token_count: 10,
            },
            score,
        }
    }

    #[test]
    fn default_template_cites_numbered_sources() {
        let results = vec![
            result("ch1", "intro", "Robots are machines.", 0.9),
            result("ch2", "sensors", "Sensors measure the world.", 0.8),
        ];
        let prompt = build_prompt(
            "What is a robot?",
            &results,
            None,
            None,
            LearningLevel::Intermediate,
        );

        assert!(prompt.contains("[Source 1 - ch1/intro]\nRobots are machines."));
        assert!(prompt.contains("[Source 2 - ch2/sensors]"));
        assert!(prompt.contains("Question: What is a robot?"));
        assert!(prompt.contains("User Learning Level: Intermediate"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let results = vec![result("ch1", "intro", "text", 0.9)];
        let a = build_prompt("q", &results, Some("sel"), Some(Intent::Explain), LearningLevel::Beginner);
        let b = build_prompt("q", &results, Some("sel"), Some(Intent::Explain), LearningLevel::Beginner);
        assert_eq!(a, b);
    }

    #[test]
    fn summarize_with_selection_uses_triple_quotes() {
        let prompt = build_prompt(
            "summarize this",
            &[],
            Some("PID control adjusts output."),
            Some(Intent::Summarize),
            LearningLevel::Beginner,
        );
        assert!(prompt.contains("\"\"\"PID control adjusts output.\"\"\""));
        assert!(prompt.contains("concise summary of the selected text"));
        assert!(prompt.contains("Explain in very simple terms"));
    }

    #[test]
    fn mindmap_template_has_no_level_instruction() {
        let prompt = build_prompt(
            "map it",
            &[],
            Some("SLAM"),
            Some(Intent::Mindmap),
            LearningLevel::Advanced,
        );
        assert!(prompt.contains("Topic: \"SLAM\""));
        assert!(!prompt.contains("Instruction:"));
    }

    #[test]
    fn empty_results_produce_no_context_block() {
        let prompt = build_prompt("q", &[], None, None, LearningLevel::Intermediate);
        assert!(!prompt.contains("Relevant content from the book"));
    }

    #[test]
    fn unknown_level_falls_back_to_intermediate() {
        assert_eq!(LearningLevel::parse("expert"), LearningLevel::Intermediate);
        assert_eq!(LearningLevel::parse(""), LearningLevel::Intermediate);
        assert_eq!(LearningLevel::parse("Advanced"), LearningLevel::Advanced);
    }

    #[test]
    fn intent_labels_parse_case_insensitively() {
        assert_eq!(Intent::parse("Summarize"), Some(Intent::Summarize));
        assert_eq!(Intent::parse("MINDMAP"), Some(Intent::Mindmap));
        assert_eq!(Intent::parse("translate"), None);
    }
}
