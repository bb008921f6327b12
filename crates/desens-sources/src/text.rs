use async_trait::async_trait;
use std::path::Path;

use crate::reader::DocumentReader;
use crate::{ReadError, Result};

/// UTF-8 plain text, one paragraph per line
pub struct TextReader;

#[async_trait]
impl DocumentReader for TextReader {
    async fn read(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = tokio::fs::read(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| ReadError::malformed(path, e))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        Ok(content.lines().map(str::to_string).collect())
    }

    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }
}
