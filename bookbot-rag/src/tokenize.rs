//! Token counting for chunk sizing.
//!
//! Uses the model's BPE tokenizer when one is available. When the tokenizer
//! cannot be loaded (unknown model name), counting falls back to a fixed
//! 4-bytes-per-token heuristic. The fallback is deterministic but produces
//! different chunk boundaries than the real tokenizer, so a counter built for
//! an unknown model must be used consistently for a whole ingestion batch.

use tiktoken_rs::{get_bpe_from_model, CoreBPE};
use tracing::warn;

/// Bytes per token assumed by the heuristic fallback.
const BYTES_PER_TOKEN: usize = 4;

/// Counts tokens with a model tokenizer, or a byte heuristic when none loads.
pub struct TokenCounter {
    bpe: Option<CoreBPE>,
}

impl TokenCounter {
    /// Create a counter for the given model name.
    ///
    /// Falls back to the byte heuristic if no tokenizer is known for the model.
    pub fn for_model(model: &str) -> Self {
        let bpe = match get_bpe_from_model(model) {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                warn!(model, error = %e, "no tokenizer for model, using byte heuristic");
                None
            }
        };
        Self { bpe }
    }

    /// Create a counter that always uses the byte heuristic.
    pub fn heuristic() -> Self {
        Self { bpe: None }
    }

    /// Count the tokens in `text`.
    pub fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => text.len() / BYTES_PER_TOKEN,
        }
    }

    /// Return the trailing `n` tokens' worth of `text`, for overlap seeding.
    ///
    /// Returns the whole text when it is `n` tokens or shorter. The heuristic
    /// path takes the last `4 * n` bytes snapped forward to a char boundary.
    pub fn tail(&self, text: &str, n: usize) -> String {
        if n == 0 {
            return String::new();
        }
        if let Some(bpe) = &self.bpe {
            let tokens = bpe.encode_with_special_tokens(text);
            if tokens.len() <= n {
                return text.to_string();
            }
            let tail = tokens[tokens.len() - n..].to_vec();
            if let Ok(decoded) = bpe.decode(tail) {
                return decoded;
            }
            // Token tail split a multi-byte sequence; fall through to bytes.
        }
        let keep = n * BYTES_PER_TOKEN;
        if keep >= text.len() {
            return text.to_string();
        }
        let mut start = text.len() - keep;
        while !text.is_char_boundary(start) {
            start += 1;
        }
        text[start..].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_count_is_len_over_four() {
        let counter = TokenCounter::heuristic();
        assert_eq!(counter.count("abcdefgh"), 2);
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn heuristic_tail_respects_char_boundaries() {
        let counter = TokenCounter::heuristic();
        // Multi-byte text must not be sliced mid-codepoint.
        let text = "τ = I × α, ω = dθ/dt, повторение";
        let tail = counter.tail(text, 2);
        assert!(text.ends_with(&tail));
        assert!(tail.len() <= 2 * BYTES_PER_TOKEN + 4);
    }

    #[test]
    fn tail_of_short_text_is_whole_text() {
        let counter = TokenCounter::heuristic();
        assert_eq!(counter.tail("hi", 10), "hi");
    }

    #[test]
    fn model_counter_loads_for_known_model() {
        let counter = TokenCounter::for_model("gpt-3.5-turbo");
        assert!(counter.count("hello world") > 0);
    }
}
