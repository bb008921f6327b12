use std::path::{Path, PathBuf};

/// Separator used when paragraphs are joined into document text
pub const PARAGRAPH_DELIMITER: char = '\n';

/// Ordered paragraphs extracted from one source file.
///
/// Stages never mutate a document in place; each produces new text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub source: Option<PathBuf>,
    pub paragraphs: Vec<String>,
}

impl Document {
    pub fn new(paragraphs: Vec<String>) -> Self {
        Self {
            source: None,
            paragraphs,
        }
    }

    /// Split already-joined document text back into paragraphs
    pub fn from_text(text: &str) -> Self {
        Self::new(
            text.split(PARAGRAPH_DELIMITER)
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn with_source(mut self, source: impl AsRef<Path>) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    /// True when no paragraph carries anything but whitespace
    pub fn is_blank(&self) -> bool {
        self.paragraphs.iter().all(|p| p.trim().is_empty())
    }

    pub fn join(&self) -> String {
        join_paragraphs(&self.paragraphs)
    }
}

pub fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    let mut out = String::new();
    for (index, paragraph) in paragraphs.iter().enumerate() {
        if index > 0 {
            out.push(PARAGRAPH_DELIMITER);
        }
        out.push_str(paragraph.as_ref());
    }
    out
}
