//! Keyword intent detection and greeting handling.

use crate::prompt::Intent;

const GREETING_KEYWORDS: &[&str] =
    &["hello", "hi", "hey", "greetings", "good morning", "good afternoon", "good evening"];

/// The canned reply for greetings.
pub const GREETING_ANSWER: &str = "Hello! 👋 I'm your AI assistant for Physical AI and Humanoid Robotics. I can help you with:\n\n\
• Understanding robotics concepts\n\
• Explaining ROS2 and digital twins\n\
• Learning about sensors, actuators, and AI integration\n\
• Summarizing, explaining, or creating mind maps from selected text\n\n\
What would you like to know today?";

/// Substring scan over the greeting keyword list.
pub fn is_greeting(question: &str) -> bool {
    let question = question.to_lowercase();
    GREETING_KEYWORDS.iter().any(|kw| question.contains(kw))
}

/// Infer the user's intent from the question text.
///
/// Intents only make sense when the user has selected text to act on; with
/// no selection this always returns `None` and the default template is used.
/// The first keyword table that matches wins, in fixed order.
pub fn detect_intent(question: &str, context_text: Option<&str>) -> Option<Intent> {
    context_text?;

    let question = question.to_lowercase();
    let tables: [(Intent, &[&str]); 7] = [
        (Intent::Summarize, &["summarize", "summary", "concise", "tldr"]),
        (
            Intent::Explain,
            &["explain", "clarify", "understand", "what does", "what is", "eli5"],
        ),
        (
            Intent::Keypoints,
            &["key points", "keypoints", "main points", "important", "critical"],
        ),
        (
            Intent::Mindmap,
            &["mind map", "mindmap", "diagram", "visualize", "structure"],
        ),
        (
            Intent::Simplify,
            &["simplify", "simpler", "make it simple", "easier", "dumb it down"],
        ),
        (
            Intent::Brief,
            &["brief", "briefly", "quick answer", "short answer", "in short"],
        ),
        (
            Intent::Elaborate,
            &["elaborate", "more detail", "expand", "tell me more", "go deeper"],
        ),
    ];

    tables
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| question.contains(kw)))
        .map(|(intent, _)| *intent)
}
