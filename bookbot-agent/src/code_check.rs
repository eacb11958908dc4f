//! Static checks over robotics code snippets.
//!
//! Supports Python, C++, and ROS2 snippets with four analysis passes:
//! error check, optimization, best practices, and documentation. These are
//! shallow pattern checks, not a compiler; findings are rendered as a
//! markdown list under a heading.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::outcome::{invalid_query_outcome, valid_query, AgentOutcome};

/// The languages the checker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Cpp,
    Ros2,
}

impl Language {
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "python" => Some(Self::Python),
            "cpp" => Some(Self::Cpp),
            "ros2" => Some(Self::Ros2),
            _ => None,
        }
    }

    fn display_upper(self) -> &'static str {
        match self {
            Self::Python => "PYTHON",
            Self::Cpp => "CPP",
            Self::Ros2 => "ROS2",
        }
    }
}

/// The analysis passes the checker can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    ErrorCheck,
    Optimization,
    BestPractices,
    Documentation,
}

impl AnalysisKind {
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "error_check" => Some(Self::ErrorCheck),
            "optimization" => Some(Self::Optimization),
            "best_practices" => Some(Self::BestPractices),
            "documentation" => Some(Self::Documentation),
            _ => None,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::ErrorCheck => "Error Check",
            Self::Optimization => "Optimization",
            Self::BestPractices => "Best Practices",
            Self::Documentation => "Documentation",
        }
    }
}

/// A request to analyze a code snippet. Language and analysis type arrive as
/// strings (the caller's wire format) and are validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysisRequest {
    pub code: Option<String>,
    pub language: String,
    pub analysis_type: String,
}

/// The code-analysis subagent.
#[derive(Debug, Default)]
pub struct CodeAnalysisAgent;

impl CodeAnalysisAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, query: &str, request: Option<&CodeAnalysisRequest>) -> AgentOutcome {
        if !valid_query(query) {
            return invalid_query_outcome();
        }
        let request = match request {
            Some(req) => req,
            None => return AgentOutcome::err("Missing context for code analysis"),
        };

        let code = match request.code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => return AgentOutcome::err("No code provided for analysis"),
        };

        let language = match Language::parse(&request.language) {
            Some(lang) => lang,
            None => {
                return AgentOutcome::err(format!(
                    "Unsupported language: {}. Supported: python, cpp, ros2",
                    request.language
                ))
            }
        };
        let analysis = match AnalysisKind::parse(&request.analysis_type) {
            Some(kind) => kind,
            None => {
                return AgentOutcome::err(format!(
                    "Unsupported analysis type: {}. Supported: error_check, \
                     optimization, best_practices, documentation",
                    request.analysis_type
                ))
            }
        };

        let body = match analysis {
            AnalysisKind::ErrorCheck => check_errors(code, language),
            AnalysisKind::Optimization => check_optimization(code, language),
            AnalysisKind::BestPractices => check_best_practices(code, language),
            AnalysisKind::Documentation => check_documentation(code, language),
        };

        AgentOutcome::ok(format!(
            "## {} Analysis for {} Code\n\n{}",
            analysis.title(),
            language.display_upper(),
            body
        ))
    }
}

fn bulleted(header: &str, findings: &[String], none_message: &str) -> String {
    if findings.is_empty() {
        none_message.to_string()
    } else {
        let items: Vec<String> = findings.iter().map(|f| format!("- {f}")).collect();
        format!("{header}\n{}", items.join("\n"))
    }
}

fn check_errors(code: &str, language: Language) -> String {
    let mut findings = Vec::new();

    match language {
        Language::Python => {
            for (i, line) in code.lines().enumerate() {
                let n = i + 1;
                if line.matches('(').count() != line.matches(')').count() {
                    findings.push(format!("Line {n}: Unmatched parentheses"));
                }
                if line.matches('[').count() != line.matches(']').count() {
                    findings.push(format!("Line {n}: Unmatched brackets"));
                }
                if line.matches('{').count() != line.matches('}').count() {
                    findings.push(format!("Line {n}: Unmatched braces"));
                }
            }
        }
        Language::Cpp => {
            for (i, line) in code.lines().enumerate() {
                if line.matches('{').count() != line.matches('}').count() {
                    findings.push(format!("Line {}: Unmatched braces", i + 1));
                }
            }
        }
        Language::Ros2 => {
            let has_node = code.lines().any(|l| l.contains("Node("));
            let has_spin = code.lines().any(|l| l.contains("spin("));
            for (i, line) in code.lines().enumerate() {
                let n = i + 1;
                if line.contains("rclpy.init(") && !has_node {
                    findings.push(format!("Line {n}: rclpy initialized but no Node created"));
                }
                if line.contains("rclpy.init(") && !has_spin {
                    findings.push(format!("Line {n}: Node created but never spun"));
                }
            }
        }
    }

    bulleted("Errors found:", &findings, "No obvious errors found in the code.")
}

fn check_optimization(code: &str, language: Language) -> String {
    static NUMPY_LOOP: OnceLock<Regex> = OnceLock::new();
    let numpy_loop =
        NUMPY_LOOP.get_or_init(|| Regex::new(r"np\..*loop").expect("valid regex"));

    let mut findings = Vec::new();

    match language {
        Language::Python => {
            if code.contains("for") && code.contains("append") {
                findings.push(
                    "Consider using list comprehensions instead of loops with append() \
                     for better performance."
                        .to_string(),
                );
            }
            if code.contains("pandas") && code.contains("iterrows()") {
                findings.push(
                    "Avoid iterrows() for large DataFrames. Use vectorized operations \
                     or apply() instead."
                        .to_string(),
                );
            }
            if numpy_loop.is_match(code) || code.contains("while True:") {
                findings.push(
                    "Consider using vectorized operations instead of explicit loops \
                     for better performance."
                        .to_string(),
                );
            }
        }
        Language::Cpp => {
            if code.contains("new") && !code.contains("delete") {
                findings.push(
                    "Memory allocated with 'new' should be freed with 'delete' to \
                     prevent memory leaks. Consider using smart pointers."
                        .to_string(),
                );
            }
            if code.contains("std::vector") && code.contains("push_back") {
                findings.push(
                    "Pre-allocate vector capacity with reserve() if the final size is \
                     known to avoid repeated reallocations."
                        .to_string(),
                );
            }
        }
        Language::Ros2 => {
            if code.contains("create_publisher") {
                findings.push(
                    "Consider setting appropriate QoS (Quality of Service) profiles \
                     for better performance."
                        .to_string(),
                );
            }
            if code.contains("for") && code.contains("rclpy") {
                findings.push(
                    "Avoid blocking operations inside loops that run at high \
                     frequency. Consider using timers."
                        .to_string(),
                );
            }
        }
    }

    bulleted(
        "Optimization opportunities:",
        &findings,
        "No obvious optimization opportunities found in the code.",
    )
}

fn check_best_practices(code: &str, language: Language) -> String {
    static PRINT_CALL: OnceLock<Regex> = OnceLock::new();
    static RCLPY_INIT: OnceLock<Regex> = OnceLock::new();
    let print_call =
        PRINT_CALL.get_or_init(|| Regex::new(r"print\s*\(").expect("valid regex"));
    let rclpy_init =
        RCLPY_INIT.get_or_init(|| Regex::new(r"rclpy\.init").expect("valid regex"));

    let mut findings = Vec::new();

    match language {
        Language::Python => {
            if code.contains("import *") {
                findings.push(
                    "Avoid 'from module import *' as it clutters the namespace and \
                     makes it unclear which names are present."
                        .to_string(),
                );
            }
            let has_main_guard = code.contains("__name__ == \"__main__\"");
            if !has_main_guard && (code.contains("def main") || !code.contains("if __name__")) {
                findings.push(
                    "Use 'if __name__ == \"__main__\":' to allow the script to be run \
                     directly or imported as a module."
                        .to_string(),
                );
            }
            if print_call.is_match(code) {
                findings.push(
                    "Consider using proper logging instead of print() statements for \
                     debugging and production code."
                        .to_string(),
                );
            }
        }
        Language::Cpp => {
            if code.contains("using namespace std") {
                findings.push(
                    "Avoid 'using namespace std' in headers. Use fully qualified names \
                     or specific using declarations."
                        .to_string(),
                );
            }
            if code.contains("#include <iostream>") && !code.contains("std::cout") {
                findings.push(
                    "Include only the headers that are actually needed in the code.".to_string(),
                );
            }
        }
        Language::Ros2 => {
            if code.contains("rclpy.Rate") {
                findings.push(
                    "Consider using rclpy.node.create_rate() or node.create_timer() \
                     instead of rclpy.Rate for better ROS2 practices."
                        .to_string(),
                );
            }
            if code.contains("__main__") && !rclpy_init.is_match(code) {
                findings.push(
                    "Ensure rclpy is properly initialized and shutdown in main function."
                        .to_string(),
                );
            }
        }
    }

    bulleted(
        "Best practices issues:",
        &findings,
        "No obvious best practices issues found in the code.",
    )
}

fn check_documentation(code: &str, language: Language) -> String {
    static PY_DEF: OnceLock<Regex> = OnceLock::new();
    static PY_CLASS: OnceLock<Regex> = OnceLock::new();
    static CPP_FN: OnceLock<Regex> = OnceLock::new();
    static CPP_COMMENT: OnceLock<Regex> = OnceLock::new();
    let py_def = PY_DEF.get_or_init(|| Regex::new(r"def \w+\s*\(").expect("valid regex"));
    let py_class = PY_CLASS.get_or_init(|| Regex::new(r"class \w+").expect("valid regex"));
    let cpp_fn = CPP_FN.get_or_init(|| {
        Regex::new(r"void \w+\s*\(|int \w+\s*\(|float \w+\s*\(").expect("valid regex")
    });
    let cpp_comment =
        CPP_COMMENT.get_or_init(|| Regex::new(r"//|/\*|\*/").expect("valid regex"));

    let mut findings = Vec::new();

    match language {
        Language::Python => {
            let has_docstring = code.contains("\"\"\"") || code.contains("'''");
            if py_def.is_match(code) && !has_docstring {
                findings.push(
                    "Functions should have docstrings explaining their purpose, \
                     parameters, and return values."
                        .to_string(),
                );
            }
            if py_class.is_match(code) && !has_docstring {
                findings.push(
                    "Classes should have docstrings explaining their purpose and usage."
                        .to_string(),
                );
            }
        }
        Language::Cpp => {
            if cpp_fn.is_match(code) && !cpp_comment.is_match(code) {
                findings.push(
                    "Functions should have comments explaining their purpose and \
                     parameters."
                        .to_string(),
                );
            }
        }
        Language::Ros2 => {
            if code.contains("class") && code.contains("Node") {
                findings.push(
                    "ROS2 Nodes should be thoroughly documented with comments \
                     explaining publishers, subscribers, and services."
                        .to_string(),
                );
            }
            if code.contains("create_publisher") || code.contains("create_subscription") {
                findings.push(
                    "Publishers and subscribers should be documented with comments \
                     explaining the message types and purpose."
                        .to_string(),
                );
            }
        }
    }

    bulleted(
        "Documentation issues:",
        &findings,
        "No obvious documentation issues found in the code.",
    )
}
