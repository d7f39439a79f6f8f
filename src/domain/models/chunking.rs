//! Text chunking domain models
//!
//! Models for splitting a document into overlapping character windows
//! before embedding.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Size of each chunk in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks of the same document
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    /// 1000 characters per chunk with 200 characters of overlap
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration with explicit size and overlap
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Distance in characters between the starts of consecutive chunks
    pub const fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }

        Ok(())
    }
}

/// A contiguous span of a source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the source document in the ingested sequence
    pub document_index: usize,

    /// Index of this chunk within its source document (0-based)
    pub chunk_index: usize,

    /// The text content of this chunk
    pub content: String,

    /// Start position in the source document (character offset, inclusive)
    pub start_offset: usize,

    /// End position in the source document (character offset, exclusive)
    pub end_offset: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(
        document_index: usize,
        chunk_index: usize,
        content: String,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            document_index,
            chunk_index,
            content,
            start_offset,
            end_offset,
        }
    }

    /// Returns true if this is the first chunk of its document
    pub const fn is_first(&self) -> bool {
        self.chunk_index == 0
    }

    /// Length of the chunk in characters
    pub const fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Get a preview of the content (first 100 chars)
    pub fn preview(&self) -> String {
        if self.char_len() <= 100 {
            self.content.clone()
        } else {
            format!("{}...", self.content.chars().take(100).collect::<String>())
        }
    }
}
