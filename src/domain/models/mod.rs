//! Domain models
//!
//! Plain data types shared by the services, adapters and callers.

pub mod chat;
pub mod chunking;
pub mod config;
pub mod document;
pub mod index;

pub use chat::{ChatRole, ChatTurn};
pub use chunking::{Chunk, ChunkingConfig};
pub use config::{Config, LoggingConfig, OpenAiConfig, RagConfig};
pub use document::Document;
pub use index::{IndexSummary, RetrievalResult, RetrievedChunk};
