//! Recognizer trait

use async_trait::async_trait;
use desens_core::TextSpan;

use crate::Result;

/// Entity recognizer consumed by the redaction pipeline.
///
/// Called once per chunk, sequentially. Offsets in the returned spans are
/// character offsets into `text`. Spans need not be sorted or disjoint.
/// An `Err` leaves the chunk unredacted; it never aborts the document.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<TextSpan>>;

    /// Short name for logs
    fn name(&self) -> &str;
}
