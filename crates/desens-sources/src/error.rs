use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReadError>;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Input path does not exist: {0}")]
    NotFound(String),

    #[error("Unsupported document format: {0}")]
    Unsupported(String),

    #[error("Malformed document {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Document has no extractable text: {0}")]
    Empty(String),

    #[error("Required tool '{0}' not found in PATH")]
    ToolMissing(String),

    #[error("{tool} failed on {path}: {stderr}")]
    ToolFailed {
        tool: String,
        path: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReadError {
    pub(crate) fn malformed(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Malformed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
