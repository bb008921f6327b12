//! Redaction engine
//!
//! Ties the pieces together: the multi-pass [`Pipeline`] redacts the
//! paragraphs of one document, and a [`Job`] runs the pipeline over every
//! eligible input file, reporting progress as [`JobEvent`]s.

pub mod cancel;
pub mod error;
pub mod job;
pub mod pipeline;

pub use cancel::CancellationFlag;
pub use error::{EngineError, Result};
pub use job::{FileReport, Job, JobEvent, JobHandle, JobReport};
pub use pipeline::{Pipeline, PipelineOptions, Redacted};
