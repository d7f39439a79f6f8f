//! Service layer: chunking, indexing, retrieval and prompt assembly

pub mod chat_service;
pub mod chunker;
pub mod prompt;
pub mod rag_orchestrator;
pub mod vector_index;

pub use chat_service::ChatService;
pub use chunker::Chunker;
pub use rag_orchestrator::RagOrchestrator;
pub use vector_index::{cosine_similarity, VectorIndex, VectorRecord};
