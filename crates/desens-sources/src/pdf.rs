//! PDF reader backed by poppler's `pdftotext`

use async_trait::async_trait;
use std::path::Path;

use crate::reader::DocumentReader;
use crate::{ReadError, Result};

/// Page separator emitted by pdftotext
const FORM_FEED: char = '\u{c}';

/// One paragraph per page
pub struct PdfReader {
    tool: String,
}

impl PdfReader {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

#[async_trait]
impl DocumentReader for PdfReader {
    async fn read(&self, path: &Path) -> Result<Vec<String>> {
        let stdout = crate::tool::run(&self.tool, &["-enc", "UTF-8"], path, &["-"]).await?;
        let pages = split_pages(&stdout);

        if pages.iter().all(|page| page.trim().is_empty()) {
            return Err(ReadError::Empty(path.display().to_string()));
        }

        Ok(pages)
    }

    fn extensions(&self) -> &[&'static str] {
        &["pdf"]
    }
}

fn split_pages(text: &str) -> Vec<String> {
    let text = text.strip_suffix(FORM_FEED).unwrap_or(text);
    text.split(FORM_FEED)
        .map(|page| page.trim_end_matches('\n').to_string())
        .collect()
}
