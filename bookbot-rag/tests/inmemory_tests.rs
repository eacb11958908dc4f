//! Property tests for in-memory vector store search ordering.

use bookbot_rag::document::{Chunk, EmbeddedChunk};
use bookbot_rag::inmemory::InMemoryVectorStore;
use bookbot_rag::vectorstore::VectorStore;
use proptest::prelude::*;
use std::collections::HashMap;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate an embedded chunk with a normalized embedding.
fn arb_point(dim: usize) -> impl Strategy<Value = EmbeddedChunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, content, embedding)| EmbeddedChunk {
            id,
            chunk: Chunk {
                content,
                chapter: "robotics".to_string(),
                section: "props".to_string(),
                source_file: "prop.md".to_string(),
                chunk_index: 0,
                token_count: 4,
            },
            embedding,
        },
    )
}

const DIM: usize = 16;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Search returns results ordered by descending cosine similarity,
    /// bounded by `limit`, with every score at or above the threshold.
    #[test]
    fn results_ordered_bounded_and_above_threshold(
        points in proptest::collection::vec(arb_point(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        limit in 1usize..25,
        threshold in -1.0f32..1.0f32,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (results, unique_count) = rt.block_on(async {
            let store = InMemoryVectorStore::new();

            // Deduplicate by id so upsert replacement does not shrink the set.
            let mut deduped: HashMap<String, EmbeddedChunk> = HashMap::new();
            for point in &points {
                deduped.entry(point.id.clone()).or_insert_with(|| point.clone());
            }
            let unique: Vec<EmbeddedChunk> = deduped.into_values().collect();
            let count = unique.len();

            store.upsert(&unique).await.unwrap();
            let results = store.search(&query, limit, threshold, None).await.unwrap();
            (results, count)
        });

        prop_assert!(results.len() <= limit);
        prop_assert!(results.len() <= unique_count);

        for result in &results {
            prop_assert!(result.score >= threshold);
        }

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}
