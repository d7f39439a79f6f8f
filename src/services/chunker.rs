//! Text chunking service
//!
//! Splits extracted document text into fixed-size, overlapping character
//! windows ready for embedding.

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Chunk, ChunkingConfig};

/// Character-window text chunker
///
/// Offsets and sizes count Unicode scalar values, so a chunk never splits a
/// multi-byte character. Output depends only on the configuration and the
/// input text.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a new chunker with default configuration (1000 / 200)
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }

    /// Create a new chunker with custom configuration
    ///
    /// Fails with [`RagError::Configuration`] when the overlap is not smaller
    /// than the chunk size or the chunk size is zero.
    pub fn with_config(config: ChunkingConfig) -> RagResult<Self> {
        config
            .validate()
            .map_err(|e| RagError::Configuration(format!("Invalid chunking config: {e}")))?;

        Ok(Self { config })
    }

    /// Active configuration
    pub const fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Split every document into chunks, preserving document order
    pub fn split(&self, documents: &[String]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = documents
            .iter()
            .enumerate()
            .flat_map(|(document_index, text)| self.split_text(document_index, text))
            .collect();

        tracing::debug!(
            documents = documents.len(),
            chunks = chunks.len(),
            chunk_size = self.config.chunk_size,
            chunk_overlap = self.config.chunk_overlap,
            "Split documents into chunks"
        );

        chunks
    }

    /// Split a single document
    pub fn split_text(&self, document_index: usize, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char boundary, plus the end of the string.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        loop {
            let end = (start + self.config.chunk_size).min(char_count);
            let content = text[boundaries[start]..boundaries[end]].to_string();

            chunks.push(Chunk::new(document_index, chunk_index, content, start, end));

            if end >= char_count {
                break;
            }

            start += self.config.stride();
            chunk_index += 1;
        }

        chunks
    }

    /// Number of chunks a document of `char_count` characters produces
    pub const fn expected_chunks(&self, char_count: usize) -> usize {
        if char_count == 0 {
            0
        } else if char_count <= self.config.chunk_size {
            1
        } else {
            let stride = self.config.stride();
            (char_count - self.config.chunk_overlap).div_ceil(stride)
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}
