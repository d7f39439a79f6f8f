//! In-memory vector index
//!
//! Holds one embedding per chunk of a single document and answers
//! similarity queries by linear scan.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Chunk, RetrievalResult, RetrievedChunk};
use crate::domain::ports::EmbeddingProvider;

/// A chunk paired with its embedding
#[derive(Debug, Clone)]
pub struct VectorRecord {
    /// The embedded chunk
    pub chunk: Chunk,

    /// Embedding vector
    pub vector: Vec<f32>,
}

/// Immutable, fully built index over one document's chunks
///
/// Built once by [`VectorIndex::build`] and never mutated afterwards, so it can
/// be shared behind an `Arc` and searched from any number of tasks.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    id: Uuid,
    source_name: String,
    created_at: DateTime<Utc>,
    dimension: usize,
    records: Vec<VectorRecord>,
}

impl VectorIndex {
    /// Embed every chunk and assemble a new index
    ///
    /// The provider receives all chunk texts in a single call. A provider
    /// failure, a vector count that differs from the chunk count, or vectors
    /// of differing dimension all fail with [`RagError::Embedding`].
    pub async fn build(
        source_name: impl Into<String>,
        chunks: Vec<Chunk>,
        provider: &dyn EmbeddingProvider,
    ) -> RagResult<Self> {
        let source_name = source_name.into();
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();

        tracing::debug!(
            provider = provider.name(),
            source = %source_name,
            chunks = texts.len(),
            "Embedding chunks"
        );

        let vectors = provider.embed(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(RagError::Embedding(format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let dimension = vectors.first().map_or(0, Vec::len);
        if let Some(position) = vectors.iter().position(|v| v.len() != dimension) {
            return Err(RagError::Embedding(format!(
                "vector {position} has dimension {}, expected {dimension}",
                vectors[position].len()
            )));
        }

        let records = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| VectorRecord { chunk, vector })
            .collect();

        Ok(Self::from_records(source_name, dimension, records))
    }

    /// Assemble an index from records that are already embedded
    pub fn from_records(
        source_name: impl Into<String>,
        dimension: usize,
        records: Vec<VectorRecord>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_name: source_name.into(),
            created_at: Utc::now(),
            dimension,
            records,
        }
    }

    /// Return the `k` records most similar to `query`, best first
    ///
    /// Equal scores keep insertion order. `k == 0` or an empty index yields an
    /// empty result.
    pub fn search(&self, query: &[f32], k: usize) -> RetrievalResult {
        if k == 0 {
            return RetrievalResult::default();
        }

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(position, record)| (position, cosine_similarity(query, &record.vector)))
            .collect();

        // sort_by is stable, so ties stay in insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        let hits = scored
            .into_iter()
            .map(|(position, score)| RetrievedChunk {
                text: self.records[position].chunk.content.clone(),
                position,
                score,
            })
            .collect();

        RetrievalResult { hits }
    }

    /// Generated identifier of this index
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the indexed document
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// When the build finished
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Dimension shared by every vector in the index
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the index holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }
}

/// Cosine similarity of two vectors
///
/// Returns 0.0 when either vector has zero norm, the lengths differ, or a
/// non-finite component makes the result undefined.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if score.is_finite() {
        score
    } else {
        0.0
    }
}
