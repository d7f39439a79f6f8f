use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid chunk_size: {0}. Must be at least 1")]
    InvalidChunkSize(usize),

    #[error("Invalid chunk_overlap: {overlap}. Must be less than chunk_size ({size})")]
    InvalidChunkOverlap { overlap: usize, size: usize },

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid temperature: {0}. Must be between 0 and 2")]
    InvalidTemperature(f32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("openai.{0} cannot be empty")]
    EmptySetting(&'static str),

    #[error("Invalid {field}: {value}. Must be at least 1")]
    InvalidLimit { field: &'static str, value: u64 },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .docrag/config.yaml (project config)
    /// 3. .docrag/local.yaml (project local overrides, optional)
    /// 4. Environment variables (DOCRAG_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("DOCRAG_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".docrag/config.yaml"))
            .merge(Yaml::file(".docrag/local.yaml"))
            .merge(Env::prefixed("DOCRAG_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let rag = &config.rag;

        if rag.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(rag.chunk_size));
        }

        if rag.chunk_overlap >= rag.chunk_size {
            return Err(ConfigError::InvalidChunkOverlap {
                overlap: rag.chunk_overlap,
                size: rag.chunk_size,
            });
        }

        if rag.top_k == 0 {
            return Err(ConfigError::InvalidTopK(rag.top_k));
        }

        if !(0.0..=2.0).contains(&rag.temperature) {
            return Err(ConfigError::InvalidTemperature(rag.temperature));
        }

        // Validate logging config
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        // Validate provider config
        let openai = &config.openai;
        for (name, value) in [
            ("base_url", &openai.base_url),
            ("chat_model", &openai.chat_model),
            ("embedding_model", &openai.embedding_model),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptySetting(name));
            }
        }

        if openai.timeout_secs == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "openai.timeout_secs",
                value: 0,
            });
        }

        if openai.embedding_batch_size == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "openai.embedding_batch_size",
                value: 0,
            });
        }

        Ok(())
    }
}
