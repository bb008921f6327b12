//! Error types for desens-engine

use desens_sources::ReadError;
use desens_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No eligible files found under {0}")]
    NoEligibleFiles(String),

    #[error(transparent)]
    Core(#[from] desens_core::Error),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Job was stopped")]
    Cancelled,

    #[error("Job task failed: {0}")]
    Task(String),
}
