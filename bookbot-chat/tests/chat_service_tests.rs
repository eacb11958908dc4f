//! End-to-end chat pipeline tests with an in-memory store, a fixed embedder,
//! and a mock chat model.

use std::sync::Arc;

use async_trait::async_trait;
use bookbot_chat::{ChatError, ChatRequest, ChatService, ResponseGenerator, APOLOGY_ANSWER};
use bookbot_model::{GenerationConfig, MockChatModel};
use bookbot_rag::{
    Chunk, EmbeddedChunk, EmbeddingProvider, InMemoryVectorStore, RagConfig, RetrievalService,
    VectorStore,
};

/// Embeds every text to the same fixed vector.
struct FixedEmbedder(Vec<f32>);

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> bookbot_rag::Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }
}

fn slam_chunk() -> EmbeddedChunk {
    EmbeddedChunk {
        id: "slam-1".into(),
        chunk: Chunk {
            content: "SLAM builds a map while localizing the robot within it.".into(),
            chapter: "robotics".into(),
            section: "slam_intro".into(),
            source_file: "robotics.md".into(),
            chunk_index: 0,
            token_count: 12,
        },
        // Unit vector at cosine 0.85 to the query embedding [1, 0].
        embedding: vec![0.85, 0.526_782_7],
    }
}

async fn service_with(model: MockChatModel, chunks: Vec<EmbeddedChunk>) -> ChatService {
    let store = Arc::new(InMemoryVectorStore::new());
    store.upsert(&chunks).await.unwrap();

    let retrieval = Arc::new(RetrievalService::new(
        RagConfig::default(),
        Arc::new(FixedEmbedder(vec![1.0, 0.0])),
        store,
    ));
    let generator = Arc::new(ResponseGenerator::new(
        Arc::new(model),
        GenerationConfig::default(),
    ));
    ChatService::new(retrieval, generator)
}

#[tokio::test]
async fn grounded_question_cites_the_book() {
    let service = service_with(
        MockChatModel::new("SLAM is simultaneous localization and mapping."),
        vec![slam_chunk()],
    )
    .await;

    let response = service
        .answer(&ChatRequest {
            question: "What is SLAM?".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.answer, "SLAM is simultaneous localization and mapping.");
    assert!(!response.answer.contains("general knowledge"));
    assert_eq!(response.sources, vec!["robotics/slam_intro".to_string()]);
    assert!(response.grounded);
    assert!((response.relevance_score - 0.85).abs() < 1e-3);
}

#[tokio::test]
async fn unanswerable_question_gets_the_general_knowledge_note() {
    let service = service_with(MockChatModel::new("Probably magnets."), vec![]).await;

    let response = service
        .answer(&ChatRequest {
            question: "Describe quantum robot teleportation.".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(response.answer.starts_with("Probably magnets."));
    assert!(response.answer.contains("general knowledge"));
    assert!(!response.grounded);
    assert!(response.sources.is_empty());
    assert_eq!(response.relevance_score, 0.0);
}

#[tokio::test]
async fn greetings_short_circuit_everything() {
    // The model would fail if called; greetings must never reach it.
    let service = service_with(MockChatModel::fail_with("must not be called"), vec![]).await;

    let response = service
        .answer(&ChatRequest {
            question: "Hello there!".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(response.answer.starts_with("Hello! 👋"));
    assert!(response.sources.is_empty());
}

#[tokio::test]
async fn empty_question_is_an_input_error() {
    let service = service_with(MockChatModel::new("x"), vec![]).await;

    let err = service
        .answer(&ChatRequest {
            question: "   ".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::InvalidInput(_)));
}

#[tokio::test]
async fn calculation_questions_route_to_the_calculator() {
    // The model would fail if called; the calculator answers without it.
    let service = service_with(MockChatModel::fail_with("must not be called"), vec![]).await;

    let response = service
        .answer(&ChatRequest {
            question: "calculate the torque for a 2kg arm at 0.5m".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(response.answer.contains("9.81 N⋅m"));
    assert!(response.sources.is_empty());
}

#[tokio::test]
async fn knowledge_search_passthrough_carries_sources_and_relevance() {
    let service = service_with(
        MockChatModel::new("Sensors measure the world."),
        vec![slam_chunk()],
    )
    .await;

    // "tell me" is a general-question keyword, so this goes through the
    // knowledge-search subagent rather than the direct pipeline.
    let response = service
        .answer(&ChatRequest {
            question: "tell me about mapping sensors".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.answer, "Sensors measure the world.");
    assert_eq!(response.sources, vec!["robotics/slam_intro".to_string()]);
    assert!(response.grounded);
    assert!((response.relevance_score - 0.85).abs() < 1e-3);
}

#[tokio::test]
async fn model_failure_degrades_to_the_apology() {
    let service = service_with(MockChatModel::fail_with("upstream down"), vec![slam_chunk()]).await;

    let response = service
        .answer(&ChatRequest {
            question: "Describe SLAM loop closure.".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.answer, APOLOGY_ANSWER);
    assert!(response.sources.is_empty());
    assert_eq!(response.relevance_score, 0.0);
}
