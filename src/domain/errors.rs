//! Domain errors for the docrag pipeline.

use thiserror::Error;

/// Errors surfaced by the indexing and retrieval pipeline.
///
/// Every failure reaches the caller as one of these kinds; the transport layer
/// decides how to map them onto protocol status codes.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("No data source has been indexed. Please upload and index a PDF or TXT file first.")]
    NotIndexed,

    #[error("An index build is already in progress")]
    BuildInProgress,

    #[error("Generation failed: {0}")]
    Generation(String),
}

impl RagError {
    /// Returns true when the error was caused by the caller's input or call order
    /// rather than by a provider failure.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Ingestion(_) | Self::Configuration(_) | Self::NotIndexed | Self::BuildInProgress
        )
    }
}

/// Result alias used throughout the pipeline.
pub type RagResult<T> = Result<T, RagError>;
