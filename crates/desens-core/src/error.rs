use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid chunk length: {0} (must be greater than zero)")]
    InvalidChunkLength(usize),

    #[error("Invalid pass count: {0} (must be at least one)")]
    InvalidPassCount(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
