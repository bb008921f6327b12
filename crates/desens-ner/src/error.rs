use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecognitionError>;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Recognizer reported an error: {0}")]
    Api(String),

    #[error("Malformed recognizer response: {0}")]
    Decode(String),

    #[error("Invalid lexicon: {0}")]
    Lexicon(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
