//! docrag - single-document retrieval-augmented generation
//!
//! Ingests one document, splits it into overlapping character chunks, embeds
//! the chunks into an in-memory vector index and streams language-model answers
//! grounded in the chunks most similar to each question.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, provider ports and errors
//! - **Service Layer** (`services`): Chunking, vector search and orchestration
//! - **Adapters** (`adapters`): OpenAI-compatible providers, mocks and file loaders
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use docrag::adapters::embeddings::OpenAiEmbeddingProvider;
//! use docrag::adapters::generation::OpenAiChatProvider;
//! use docrag::domain::models::{OpenAiConfig, RagConfig};
//! use docrag::services::RagOrchestrator;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let openai = OpenAiConfig::default();
//! let rag = RagOrchestrator::new(
//!     RagConfig::default(),
//!     Arc::new(OpenAiEmbeddingProvider::new(&openai)?),
//!     Arc::new(OpenAiChatProvider::new(&openai)?),
//! )?;
//!
//! rag.index_document("Rust was first released in 2015.", "notes.txt").await?;
//! let answer = rag.answer_text("When was Rust released?", "").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{RagError, RagResult};
pub use domain::models::{
    ChatRole, ChatTurn, Chunk, ChunkingConfig, Config, Document, IndexSummary, RagConfig,
    RetrievalResult, RetrievedChunk,
};
pub use domain::ports::{DocumentLoader, EmbeddingProvider, FragmentStream, GenerationProvider};
pub use services::{ChatService, Chunker, RagOrchestrator, VectorIndex};
