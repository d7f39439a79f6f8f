//! Integration tests for the RAG orchestrator
//!
//! Exercises indexing, retrieval, grounded streaming and the concurrency
//! rules around the single active index, using the deterministic mock
//! providers.

use std::sync::Arc;
use std::time::Duration;

use docrag::adapters::embeddings::MockEmbeddingProvider;
use docrag::adapters::generation::MockGenerationProvider;
use docrag::domain::errors::RagError;
use docrag::domain::models::{ChatRole, RagConfig};
use docrag::services::prompt::{DEFAULT_PREAMBLE, MATH_FORMAT_INSTRUCTION, WORD_LIMIT_INSTRUCTION};
use futures::StreamExt;

mod common;

use common::{collect, orchestrator, orchestrator_with_config};

fn small_chunks(top_k: usize) -> RagConfig {
    RagConfig {
        chunk_size: 10,
        chunk_overlap: 0,
        top_k,
        ..RagConfig::default()
    }
}

#[tokio::test]
async fn test_answer_before_indexing_fails() {
    let generator = Arc::new(MockGenerationProvider::new(["never"]));
    let rag = orchestrator(Arc::new(MockEmbeddingProvider::new(8)), generator.clone());

    let result = rag.answer("question", "").await;
    assert!(matches!(result, Err(RagError::NotIndexed)));
    assert!(generator.calls().is_empty(), "no generation without an index");
}

#[tokio::test]
async fn test_blank_document_rejected() {
    let embedder = Arc::new(MockEmbeddingProvider::new(8));
    let rag = orchestrator(embedder.clone(), Arc::new(MockGenerationProvider::new(["x"])));

    for text in ["", "   \n\t  "] {
        let result = rag.index_document(text, "empty.txt").await;
        assert!(matches!(result, Err(RagError::Ingestion(_))));
    }

    assert!(!rag.status().is_indexed);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_1200_identical_characters() {
    let rag = orchestrator(
        Arc::new(MockEmbeddingProvider::new(8)),
        Arc::new(MockGenerationProvider::new(["x"])),
    );

    let summary = rag
        .index_document(&"A".repeat(1200), "letters.txt")
        .await
        .unwrap();

    assert!(summary.is_indexed);
    assert_eq!(summary.chunks_count, 2);
    assert_eq!(summary.source_name.as_deref(), Some("letters.txt"));
    assert!(summary.document_id.is_some());
}

#[tokio::test]
async fn test_query_matching_second_chunk_retrieves_it_first() {
    let embedder = Arc::new(
        MockEmbeddingProvider::new(3)
            .with_vector("aaaaaaaaaa", vec![1.0, 0.0, 0.0])
            .with_vector("bbbbbbbbbb", vec![0.0, 1.0, 0.0])
            .with_vector("cccccccccc", vec![0.0, 0.0, 1.0])
            .with_vector("which one?", vec![0.0, 1.0, 0.0]),
    );
    let generator = Arc::new(MockGenerationProvider::new(["b"]));
    let rag = orchestrator_with_config(small_chunks(1), embedder, generator.clone());

    let summary = rag
        .index_document("aaaaaaaaaabbbbbbbbbbcccccccccc", "abc.txt")
        .await
        .unwrap();
    assert_eq!(summary.chunks_count, 3);

    let retrieved = rag.retrieve("which one?").await.unwrap();
    assert_eq!(retrieved.texts(), vec!["bbbbbbbbbb"]);
    assert_eq!(retrieved.hits[0].position, 1);

    rag.answer_text("which one?", "").await.unwrap();
    let turns = generator.last_turns().unwrap();
    assert!(turns[0].content.contains("bbbbbbbbbb"));
    assert!(!turns[0].content.contains("aaaaaaaaaa"));
}

#[tokio::test]
async fn test_answer_streams_grounded_fragments() {
    common::setup_test_logging();

    let generator = Arc::new(MockGenerationProvider::new([
        "Rust ",
        "was ",
        "released ",
        "in 2015.",
    ]));
    let rag = orchestrator(Arc::new(MockEmbeddingProvider::new(16)), generator.clone());

    let document = "Rust 1.0 was released in May 2015 after years of development.";
    rag.index_document(document, "rust.txt").await.unwrap();

    let stream = rag.answer("question", "").await.unwrap();
    let fragments: Vec<String> = collect(stream)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();
    let answer = fragments.concat();

    assert_eq!(fragments.len(), 4, "fragments are forwarded unbuffered");
    assert_eq!(answer, "Rust was released in 2015.");

    let turns = generator.last_turns().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, ChatRole::System);
    assert_eq!(turns[1].role, ChatRole::User);
    assert_eq!(turns[1].content, "question");

    let system = &turns[0].content;
    assert!(system.starts_with(DEFAULT_PREAMBLE));
    assert!(system.contains(document), "system turn carries retrieved context");
    assert!(system.contains(WORD_LIMIT_INSTRUCTION));
    assert!(system.contains(MATH_FORMAT_INSTRUCTION));
}

#[tokio::test]
async fn test_custom_preamble_and_temperature() {
    let generator = Arc::new(MockGenerationProvider::new(["ok"]));
    let config = RagConfig {
        temperature: 0.1,
        ..RagConfig::default()
    };
    let rag = orchestrator_with_config(
        config,
        Arc::new(MockEmbeddingProvider::new(8)),
        generator.clone(),
    );

    rag.index_document("context body", "c.txt").await.unwrap();
    rag.answer_text("q", "You answer like a pirate.").await.unwrap();

    let call = generator.calls().pop().unwrap();
    assert!((call.temperature - 0.1).abs() < f32::EPSILON);
    assert!(call.turns[0].content.starts_with(
        "You answer like a pirate.\n\nUse the following context to answer the user's question:\n\ncontext body"
    ));
}

#[tokio::test]
async fn test_context_joins_top_k_chunks() {
    let embedder = Arc::new(
        MockEmbeddingProvider::new(2)
            .with_vector("first one.", vec![1.0, 0.0])
            .with_vector("second one", vec![0.9, 0.1])
            .with_vector("third one.", vec![0.0, 1.0])
            .with_vector("q", vec![1.0, 0.0]),
    );
    let generator = Arc::new(MockGenerationProvider::new(["ok"]));
    let rag = orchestrator_with_config(small_chunks(2), embedder, generator.clone());

    rag.index_document("first one.second onethird one.", "three.txt")
        .await
        .unwrap();
    rag.answer_text("q", "").await.unwrap();

    let system = generator.last_turns().unwrap()[0].content.clone();
    assert!(system.contains("Context:\nfirst one.\n\nsecond one\n\n"));
    assert!(!system.contains("third one."));
}

#[tokio::test]
async fn test_clear_and_status() {
    let rag = orchestrator(
        Arc::new(MockEmbeddingProvider::new(8)),
        Arc::new(MockGenerationProvider::new(["x"])),
    );

    rag.clear();
    assert!(!rag.status().is_indexed);

    rag.index_document("text", "t.txt").await.unwrap();
    assert!(rag.status().is_indexed);

    rag.clear();
    let status = rag.status();
    assert!(!status.is_indexed);
    assert_eq!(status.chunks_count, 0);
    assert!(status.document_id.is_none());

    rag.clear();
    assert!(matches!(rag.answer("q", "").await, Err(RagError::NotIndexed)));
}

#[tokio::test]
async fn test_reindex_replaces_previous_index() {
    let rag = orchestrator(
        Arc::new(MockEmbeddingProvider::new(8)),
        Arc::new(MockGenerationProvider::new(["x"])),
    );

    let first = rag.index_document("first document", "one.txt").await.unwrap();
    let second = rag
        .index_document(&"B".repeat(2500), "two.txt")
        .await
        .unwrap();

    assert_ne!(first.document_id, second.document_id);
    let status = rag.status();
    assert_eq!(status.document_id, second.document_id);
    assert_eq!(status.source_name.as_deref(), Some("two.txt"));
    assert_eq!(status.chunks_count, 3);
}

#[tokio::test]
async fn test_failed_build_keeps_previous_index() {
    let embedder = Arc::new(MockEmbeddingProvider::new(8).failing_on("poison"));
    let rag = orchestrator(embedder, Arc::new(MockGenerationProvider::new(["x"])));

    let good = rag.index_document("good text", "good.txt").await.unwrap();
    let result = rag.index_document("poison text", "bad.txt").await;

    assert!(matches!(result, Err(RagError::Embedding(_))));
    let status = rag.status();
    assert!(status.is_indexed);
    assert_eq!(status.document_id, good.document_id);
    assert!(!status.building, "build flag released after failure");
}

#[tokio::test]
async fn test_query_embedding_failure_is_reported() {
    let embedder = Arc::new(MockEmbeddingProvider::new(8).failing_on("poison"));
    let generator = Arc::new(MockGenerationProvider::new(["x"]));
    let rag = orchestrator(embedder, generator.clone());

    rag.index_document("document", "d.txt").await.unwrap();
    let result = rag.answer("poison question", "").await;

    assert!(matches!(result, Err(RagError::Embedding(_))));
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn test_query_dimension_mismatch() {
    let embedder = Arc::new(MockEmbeddingProvider::new(4).with_vector("odd", vec![1.0, 0.0]));
    let rag = orchestrator(embedder, Arc::new(MockGenerationProvider::new(["x"])));

    rag.index_document("document", "d.txt").await.unwrap();
    let err = rag.answer("odd", "").await.err().unwrap();
    assert!(matches!(err, RagError::Embedding(ref m) if m.contains("dimension")));
}

#[tokio::test]
async fn test_generation_failure_mid_stream() {
    let generator = Arc::new(
        MockGenerationProvider::new(["partial ", "answer"]).failing_after(1, "connection reset"),
    );
    let rag = orchestrator(Arc::new(MockEmbeddingProvider::new(8)), generator);

    rag.index_document("document", "d.txt").await.unwrap();
    let items = collect(rag.answer("q", "").await.unwrap()).await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "partial ");
    assert!(matches!(items[1], Err(RagError::Generation(_))));

    let err = rag.answer_text("q", "").await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
}

#[tokio::test]
async fn test_generation_open_failure() {
    let generator =
        Arc::new(MockGenerationProvider::new(["x"]).failing_to_open("401 Unauthorized"));
    let rag = orchestrator(Arc::new(MockEmbeddingProvider::new(8)), generator);

    rag.index_document("document", "d.txt").await.unwrap();
    let err = rag.answer("q", "").await.err().unwrap();
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn test_concurrent_build_rejected() {
    let embedder = Arc::new(MockEmbeddingProvider::new(8).with_delay(Duration::from_millis(300)));
    let rag = Arc::new(orchestrator(embedder, Arc::new(MockGenerationProvider::new(["x"]))));

    let background = {
        let rag = rag.clone();
        tokio::spawn(async move { rag.index_document("slow document", "slow.txt").await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rag.status().building);

    let rejected = rag.index_document("second document", "fast.txt").await;
    assert!(matches!(rejected, Err(RagError::BuildInProgress)));

    let summary = background.await.unwrap().unwrap();
    let status = rag.status();
    assert!(!status.building);
    assert_eq!(status.document_id, summary.document_id);
    assert_eq!(status.source_name.as_deref(), Some("slow.txt"));
}

#[tokio::test]
async fn test_clear_during_build_then_build_installs() {
    let embedder = Arc::new(MockEmbeddingProvider::new(8).with_delay(Duration::from_millis(200)));
    let rag = Arc::new(orchestrator(embedder, Arc::new(MockGenerationProvider::new(["x"]))));

    let background = {
        let rag = rag.clone();
        tokio::spawn(async move { rag.index_document("document", "d.txt").await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    rag.clear();
    assert!(!rag.status().is_indexed);

    background.await.unwrap().unwrap();
    assert!(rag.status().is_indexed);
}

#[tokio::test]
async fn test_clear_does_not_affect_inflight_answer() {
    let generator = Arc::new(MockGenerationProvider::new(["still ", "here"]));
    let rag = orchestrator(Arc::new(MockEmbeddingProvider::new(8)), generator);

    rag.index_document("document", "d.txt").await.unwrap();
    let stream = rag.answer("q", "").await.unwrap();
    rag.clear();

    let answer: String = collect(stream)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(answer, "still here");
    assert!(!rag.status().is_indexed);
}

#[tokio::test]
async fn test_concurrent_answers_share_index() {
    let rag = Arc::new(orchestrator(
        Arc::new(MockEmbeddingProvider::new(8)),
        Arc::new(MockGenerationProvider::new(["a", "b"])),
    ));
    rag.index_document("shared document", "s.txt").await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let rag = rag.clone();
            tokio::spawn(async move { rag.answer_text(&format!("question {i}"), "").await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "ab");
    }
}

#[tokio::test]
async fn test_multi_part_document() {
    let rag = orchestrator_with_config(
        small_chunks(3),
        Arc::new(MockEmbeddingProvider::new(8)),
        Arc::new(MockGenerationProvider::new(["x"])),
    );

    let parts = vec!["page one text".to_string(), String::new(), "page three".to_string()];
    let summary = rag.index_parts(parts, "paper.pdf").await.unwrap();

    // 13 chars -> 2 chunks, empty page -> none, 10 chars -> 1
    assert_eq!(summary.chunks_count, 3);
    assert_eq!(
        summary.message(),
        "File indexed successfully. Extracted 3 chunks from paper.pdf"
    );
}

#[tokio::test]
async fn test_fragments_reach_caller_while_provider_still_generating() {
    let generator = Arc::new(MockGenerationProvider::new(["first "]).stalling());
    let rag = orchestrator(Arc::new(MockEmbeddingProvider::new(8)), generator.clone());
    rag.index_document("document", "d.txt").await.unwrap();

    let mut stream = rag.answer("q", "").await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("first fragment should arrive before the provider finishes")
        .unwrap()
        .unwrap();
    assert_eq!(first, "first ");

    let next = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert!(next.is_err(), "provider is still generating");
    assert_eq!(generator.open_streams(), 1);
}

#[tokio::test]
async fn test_abandoned_answer_releases_provider_stream() {
    let generator = Arc::new(MockGenerationProvider::new(["first ", "second"]).stalling());
    let rag = orchestrator(Arc::new(MockEmbeddingProvider::new(8)), generator.clone());
    rag.index_document("document", "d.txt").await.unwrap();

    let mut stream = rag.answer("q", "").await.unwrap();
    assert_eq!(generator.open_streams(), 1);
    assert_eq!(stream.next().await.unwrap().unwrap(), "first ");

    drop(stream);
    assert_eq!(generator.open_streams(), 0, "provider stream released on drop");

    // The orchestrator stays usable after an abandoned answer
    let mut again = rag.answer("q", "").await.unwrap();
    assert_eq!(again.next().await.unwrap().unwrap(), "first ");
}

#[tokio::test]
async fn test_answer_with_sources_embeds_query_once() {
    let embedder = Arc::new(MockEmbeddingProvider::new(16));
    let generator = Arc::new(MockGenerationProvider::new(["ok"]));
    let rag = orchestrator_with_config(small_chunks(2), embedder.clone(), generator.clone());

    rag.index_document("aaaaaaaaaabbbbbbbbbbcccccccccc", "abc.txt")
        .await
        .unwrap();
    assert_eq!(embedder.calls(), 1);

    let (sources, stream) = rag.answer_with_sources("bbbb", "").await.unwrap();
    assert_eq!(embedder.calls(), 2, "query embedded exactly once");
    assert_eq!(sources.len(), 2);

    let answer: Vec<_> = collect(stream).await;
    assert_eq!(answer.len(), 1);

    let system = &generator.last_turns().unwrap()[0].content;
    assert!(system.contains(&sources.context()));
}
