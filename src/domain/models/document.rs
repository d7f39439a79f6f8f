//! Source document model

use serde::{Deserialize, Serialize};

/// Raw text extracted from an uploaded file.
///
/// Only lives for the duration of ingestion; once chunked it is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier, usually the uploaded file name
    pub source_name: String,

    /// Extracted text, one entry per loader output (e.g. per page)
    pub contents: Vec<String>,
}

impl Document {
    /// Create a document from a single text body
    pub fn new(source_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            contents: vec![content.into()],
        }
    }

    /// Create a document from the loader's sequence of raw texts
    pub fn from_parts(source_name: impl Into<String>, contents: Vec<String>) -> Self {
        Self {
            source_name: source_name.into(),
            contents,
        }
    }

    /// Returns true if no part contains anything but whitespace
    pub fn is_blank(&self) -> bool {
        self.contents.iter().all(|part| part.trim().is_empty())
    }

    /// Total length in characters across all parts
    pub fn char_len(&self) -> usize {
        self.contents.iter().map(|part| part.chars().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(Document::new("a.txt", "").is_blank());
        assert!(Document::new("a.txt", " \n\t ").is_blank());
        assert!(Document::from_parts("a.pdf", vec![]).is_blank());
        assert!(Document::from_parts("a.pdf", vec!["  ".into(), "\n".into()]).is_blank());
        assert!(!Document::from_parts("a.pdf", vec!["".into(), "page two".into()]).is_blank());
    }

    #[test]
    fn test_char_len_sums_parts() {
        let doc = Document::from_parts("a.pdf", vec!["abc".into(), "ñé".into()]);
        assert_eq!(doc.char_len(), 5);
    }
}
