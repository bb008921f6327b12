//! Core domain models for desens
//!
//! This crate contains:
//! - Recognized entity spans and their labels
//! - Documents as ordered paragraph lists
//! - Per-document redaction outcomes

pub mod document;
pub mod error;
pub mod outcome;
pub mod span;

pub use document::{Document, PARAGRAPH_DELIMITER, join_paragraphs};
pub use error::{Error, Result};
pub use outcome::{OverflowPolicy, Payload, RedactionResult, RedactionStats, RedactionStatus};
pub use span::{EntityLabel, TextSpan};
