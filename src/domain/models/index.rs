//! Index status and retrieval result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of the orchestrator's index state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Whether a fully built index is installed
    pub is_indexed: bool,

    /// Identifier generated for the indexed document
    pub document_id: Option<Uuid>,

    /// Source name of the indexed document
    pub source_name: Option<String>,

    /// Number of chunks (and vector records) in the index
    pub chunks_count: usize,

    /// When the installed index finished building
    pub created_at: Option<DateTime<Utc>>,

    /// Whether a build is currently in flight
    pub building: bool,
}

impl IndexSummary {
    /// Summary of the empty state
    pub const fn empty() -> Self {
        Self {
            is_indexed: false,
            document_id: None,
            source_name: None,
            chunks_count: 0,
            created_at: None,
            building: false,
        }
    }

    /// Human-readable outcome line for a completed ingestion
    pub fn message(&self) -> String {
        match (&self.source_name, self.is_indexed) {
            (Some(source), true) => format!(
                "File indexed successfully. Extracted {} chunks from {}",
                self.chunks_count, source
            ),
            _ => "No data source is indexed".to_string(),
        }
    }
}

impl Default for IndexSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// A chunk returned by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk text
    pub text: String,

    /// Position of the record in the index (insertion order)
    pub position: usize,

    /// Cosine similarity to the query vector
    pub score: f32,
}

/// Chunks ranked by similarity to a query, most similar first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Ranked hits, at most `k` of them
    pub hits: Vec<RetrievedChunk>,
}

impl RetrievalResult {
    /// Number of hits
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if nothing was retrieved
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Hit texts in rank order
    pub fn texts(&self) -> Vec<&str> {
        self.hits.iter().map(|hit| hit.text.as_str()).collect()
    }

    /// Hit texts joined by a blank line
    pub fn context(&self) -> String {
        self.texts().join("\n\n")
    }
}
