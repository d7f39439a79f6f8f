//! Deterministic embedding provider for tests and offline runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::ports::EmbeddingProvider;

/// Mock embedding provider.
///
/// Texts are embedded as character-frequency vectors folded into `dimension`
/// buckets, so identical texts always map to identical vectors. Individual
/// texts can be pinned to exact vectors with [`with_vector`](Self::with_vector).
pub struct MockEmbeddingProvider {
    dimension: usize,
    fixed: HashMap<String, Vec<f32>>,
    failure: Option<String>,
    poison: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    /// Create a provider producing vectors of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixed: HashMap::new(),
            failure: None,
            poison: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always embed `text` as `vector`
    #[must_use]
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.fixed.insert(text.into(), vector);
        self
    }

    /// Fail every call with an embedding error carrying `message`
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Fail any call whose input contains `needle`
    #[must_use]
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.poison = Some(needle.into());
        self
    }

    /// Sleep before answering each call
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `embed` calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(vector) = self.fixed.get(text) {
            return vector.clone();
        }

        let mut vector = vec![0.0; self.dimension];
        if self.dimension == 0 {
            return vector;
        }
        for c in text.chars().flat_map(char::to_lowercase) {
            vector[c as usize % self.dimension] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.failure {
            return Err(RagError::Embedding(message.clone()));
        }

        if let Some(needle) = &self.poison {
            if texts.iter().any(|text| text.contains(needle.as_str())) {
                return Err(RagError::Embedding(format!(
                    "rejected input containing '{needle}'"
                )));
            }
        }

        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }
}
