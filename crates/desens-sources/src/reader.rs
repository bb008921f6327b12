//! Document reader trait and registry

use async_trait::async_trait;
use desens_core::Document;
use std::path::Path;

use crate::{ReadError, Result};

/// Extracts paragraph text from one document format
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Read the file into paragraphs (or pages, for paginated formats)
    async fn read(&self, path: &Path) -> Result<Vec<String>>;

    /// Lowercase file extensions this reader accepts, without the dot
    fn extensions(&self) -> &[&'static str];

    /// Check if this reader can handle the given path
    fn can_handle(&self, path: &Path) -> bool {
        extension_of(path)
            .map(|ext| self.extensions().contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

/// Picks a reader by file extension
pub struct ReaderRegistry {
    readers: Vec<Box<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Registry with every built-in reader
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(crate::docx::DocxReader));
        registry.register(Box::new(crate::pdf::PdfReader::default()));
        registry.register(Box::new(crate::doc::DocReader::default()));
        registry.register(Box::new(crate::text::TextReader));
        registry
    }

    pub fn empty() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    pub fn register(&mut self, reader: Box<dyn DocumentReader>) {
        self.readers.push(reader);
    }

    pub fn reader_for(&self, path: &Path) -> Option<&dyn DocumentReader> {
        self.readers
            .iter()
            .find(|reader| reader.can_handle(path))
            .map(|reader| reader.as_ref())
    }

    pub async fn read(&self, path: &Path) -> Result<Document> {
        let reader = self
            .reader_for(path)
            .ok_or_else(|| ReadError::Unsupported(path.display().to_string()))?;

        let paragraphs = reader.read(path).await?;
        tracing::debug!(
            path = %path.display(),
            paragraphs = paragraphs.len(),
            "Extracted document text"
        );

        Ok(Document::new(paragraphs).with_source(path))
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
