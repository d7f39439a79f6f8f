//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for similarity search.

use async_trait::async_trait;

use crate::domain::errors::RagResult;

/// Trait for embedding providers.
///
/// Implementations must return exactly one vector per input, in input order,
/// and every vector must have the same length. Any transport or API failure
/// surfaces as [`RagError::Embedding`](crate::domain::errors::RagError::Embedding).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate embeddings for a sequence of texts.
    ///
    /// Implementations handle batching if the provider has per-request limits.
    async fn embed(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text.
    async fn embed_one(&self, text: &str) -> RagResult<Vec<f32>> {
        self.embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                crate::domain::errors::RagError::Embedding(
                    "provider returned no vector for the query".to_string(),
                )
            })
    }
}
