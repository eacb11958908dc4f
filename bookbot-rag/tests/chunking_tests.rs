//! Property tests for chunk size bounds and overlap continuity.

use bookbot_rag::chunking::MarkdownChunker;
use bookbot_rag::document::SectionMeta;
use bookbot_rag::tokenize::TokenCounter;
use proptest::prelude::*;

const CHUNK_SIZE: usize = 40;
const CHUNK_OVERLAP: usize = 5;

/// Paragraphs of a handful of short words, well under the chunk budget, so
/// the only oversized chunks the chunker may emit are single oversized
/// paragraphs (which this generator never produces).
fn arb_paragraph() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{3,8}", 3..10).prop_map(|words| words.join(" "))
}

fn arb_document() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_paragraph(), 5..40)
        .prop_map(|paragraphs| format!("## Section\n\n{}", paragraphs.join("\n\n")))
}

fn meta() -> SectionMeta {
    SectionMeta { chapter: "robotics".into(), section: "prop".into(), source_file: "prop.md".into() }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every chunk built from within-budget paragraphs stays within the
    /// token budget.
    #[test]
    fn chunks_respect_token_budget(doc in arb_document()) {
        let chunker = MarkdownChunker::new(CHUNK_SIZE, CHUNK_OVERLAP, TokenCounter::heuristic());
        let chunks = chunker.chunk(&doc, &meta());

        prop_assert!(!chunks.is_empty());
        for chunk in &chunks {
            prop_assert!(
                chunk.token_count <= CHUNK_SIZE,
                "chunk {} has {} tokens (> {})",
                chunk.chunk_index,
                chunk.token_count,
                CHUNK_SIZE,
            );
        }
    }

    /// Consecutive chunks from paragraph packing carry the previous chunk's
    /// overlap tail at their start.
    #[test]
    fn consecutive_chunks_share_overlap(doc in arb_document()) {
        let counter = TokenCounter::heuristic();
        let chunker = MarkdownChunker::new(CHUNK_SIZE, CHUNK_OVERLAP, TokenCounter::heuristic());
        let chunks = chunker.chunk(&doc, &meta());

        for window in chunks.windows(2) {
            let tail = counter.tail(&window[0].content, CHUNK_OVERLAP);
            prop_assert!(
                window[1].content.starts_with(tail.trim_start()),
                "chunk does not start with the previous chunk's overlap tail",
            );
        }
    }
}
