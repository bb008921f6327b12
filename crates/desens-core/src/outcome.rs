use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the chunker does with its pending buffer when a single sentence
/// fragment is longer than the chunk limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Emit the pending buffer first, then the hard-sliced fragment.
    #[default]
    Flush,
    /// Drop the pending buffer. Loses text. Older tooling instead emitted
    /// the buffer and kept it, so it reappeared ahead of the next chunk.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionStatus {
    Success,
    /// At least one chunk was left unredacted because recognition failed
    Partial,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionStats {
    pub paragraphs: usize,
    pub chunks: usize,
    pub spans_redacted: usize,
    pub pattern_matches: usize,
    pub failed_chunks: usize,
    pub passes: usize,
}

impl RedactionStats {
    pub fn status(&self) -> RedactionStatus {
        if self.failed_chunks > 0 {
            RedactionStatus::Partial
        } else {
            RedactionStatus::Success
        }
    }
}

/// Sealed pipeline output, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Encrypted(Vec<u8>),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Encrypted(blob) => blob,
        }
    }
}

/// Outcome of redacting one document, owned by the caller until written
#[derive(Debug, Clone)]
pub struct RedactionResult {
    pub source: PathBuf,
    pub status: RedactionStatus,
    pub payload: Option<Payload>,
    pub stats: RedactionStats,
    pub error: Option<String>,
}

impl RedactionResult {
    pub fn completed(source: PathBuf, payload: Payload, stats: RedactionStats) -> Self {
        Self {
            source,
            status: stats.status(),
            payload: Some(payload),
            stats,
            error: None,
        }
    }

    /// Hand the payload over to storage. The result keeps its status and
    /// stats only.
    pub fn take_payload(&mut self) -> Option<Payload> {
        self.payload.take()
    }

    pub fn failed(source: PathBuf, error: impl ToString) -> Self {
        Self {
            source,
            status: RedactionStatus::Failed,
            payload: None,
            stats: RedactionStats::default(),
            error: Some(error.to_string()),
        }
    }
}
