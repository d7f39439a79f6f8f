//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment: YAML files under `.docrag/`
//! with `DOCRAG_*` environment overrides, validated after loading.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
