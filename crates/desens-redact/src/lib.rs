//! Text-level redaction primitives
//!
//! Everything here is synchronous and side-effect free:
//! - [`Chunker`] splits paragraphs into recognizer-sized chunks
//! - [`PatternRedactor`] masks IDs and company names by regex
//! - [`SpanRedactor`] masks recognized entity spans

pub mod chunker;
pub mod patterns;
pub mod span;

pub use chunker::{Chunker, split_sentences};
pub use patterns::PatternRedactor;
pub use span::{DEFAULT_MASK, DEFAULT_UNIT_SUFFIXES, SpanRedaction, SpanRedactor};
