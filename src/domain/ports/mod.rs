//! Port traits for external collaborators

pub mod document_loader;
pub mod embedding;
pub mod generation;

pub use document_loader::DocumentLoader;
pub use embedding::EmbeddingProvider;
pub use generation::{FragmentStream, GenerationProvider};
