//! Named-entity recognizers
//!
//! The pipeline only sees the [`Recognizer`] trait. Two implementations
//! ship here: a remote HTTP API client and a local lexicon matcher.

pub mod error;
pub mod http;
pub mod lexicon;
pub mod recognizer;

pub use error::{RecognitionError, Result};
pub use http::HttpRecognizer;
pub use lexicon::{LexiconEntry, LexiconRecognizer};
pub use recognizer::Recognizer;
