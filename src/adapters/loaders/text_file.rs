//! Plain-text document loader.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::Document;
use crate::domain::ports::DocumentLoader;

/// Loads UTF-8 `.txt` files as a single-part document
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileLoader;

impl TextFileLoader {
    /// Create a new loader
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for TextFileLoader {
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
    }

    async fn load(&self, path: &Path) -> RagResult<Document> {
        if !self.supports(path) {
            return Err(RagError::Ingestion(format!(
                "unsupported file type: {} (only .txt files are accepted)",
                path.display()
            )));
        }

        let source_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RagError::Ingestion(format!("failed to read {}: {e}", path.display())))?;

        tracing::debug!(source = %source_name, bytes = text.len(), "Loaded text file");

        Ok(Document::new(source_name, text))
    }
}
