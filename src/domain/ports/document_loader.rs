//! Document loader port.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::Document;

/// Turns a file on disk into extracted text parts.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Returns true if this loader understands the file's format.
    fn supports(&self, path: &Path) -> bool;

    /// Read and extract the document. Unreadable or unsupported files
    /// fail with [`RagError::Ingestion`](crate::domain::errors::RagError::Ingestion).
    async fn load(&self, path: &Path) -> RagResult<Document>;
}
