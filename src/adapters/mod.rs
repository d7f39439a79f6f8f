//! Adapters for external systems: providers and document loaders.

pub mod embeddings;
pub mod generation;
pub mod loaders;
