//! Legacy Word (.doc) reader backed by `antiword`

use async_trait::async_trait;
use std::path::Path;

use crate::reader::DocumentReader;
use crate::{ReadError, Result};

/// One paragraph per non-blank line of antiword output
pub struct DocReader {
    tool: String,
}

impl DocReader {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl Default for DocReader {
    fn default() -> Self {
        Self::new("antiword")
    }
}

#[async_trait]
impl DocumentReader for DocReader {
    async fn read(&self, path: &Path) -> Result<Vec<String>> {
        let stdout = crate::tool::run(&self.tool, &["-w", "0"], path, &[]).await?;

        let paragraphs: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if paragraphs.is_empty() {
            return Err(ReadError::Empty(path.display().to_string()));
        }

        Ok(paragraphs)
    }

    fn extensions(&self) -> &[&'static str] {
        &["doc"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool() {
        let reader = DocReader::new("desens-no-such-antiword");
        let err = reader.read(Path::new("a.doc")).await.unwrap_err();
        assert!(matches!(err, ReadError::ToolMissing(_)));
    }
}
