//! Common test utilities for integration tests
//!
//! Shared fixtures and helpers used across multiple integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use docrag::adapters::embeddings::MockEmbeddingProvider;
use docrag::adapters::generation::MockGenerationProvider;
use docrag::domain::errors::RagResult;
use docrag::domain::models::RagConfig;
use docrag::domain::ports::FragmentStream;
use docrag::services::RagOrchestrator;
use futures::StreamExt;

/// Orchestrator wired to the given mocks with default settings
pub fn orchestrator(
    embedder: Arc<MockEmbeddingProvider>,
    generator: Arc<MockGenerationProvider>,
) -> RagOrchestrator {
    orchestrator_with_config(RagConfig::default(), embedder, generator)
}

/// Orchestrator wired to the given mocks and configuration
pub fn orchestrator_with_config(
    config: RagConfig,
    embedder: Arc<MockEmbeddingProvider>,
    generator: Arc<MockGenerationProvider>,
) -> RagOrchestrator {
    RagOrchestrator::new(config, embedder, generator).expect("valid test configuration")
}

/// Drain a fragment stream, keeping every item
pub async fn collect(stream: FragmentStream) -> Vec<RagResult<String>> {
    stream.collect().await
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
