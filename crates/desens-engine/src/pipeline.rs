//! Multi-pass redaction pipeline
//!
//! One pass: every paragraph is chunked, each chunk goes through the
//! supplementary patterns, the recognizer and the span redactor, and the
//! redacted chunks and paragraphs are joined back together. Each further
//! pass splits the joined text on the paragraph delimiter and runs the
//! same steps again. Later passes can still find new entities, so
//! `passes` is a plain repeat count.

use desens_core::{
    Document, EntityLabel, Error as CoreError, OverflowPolicy, RedactionStats, join_paragraphs,
};
use desens_ner::Recognizer;
use desens_redact::{Chunker, DEFAULT_MASK, DEFAULT_UNIT_SUFFIXES, PatternRedactor, SpanRedactor};
use std::sync::Arc;

use crate::{CancellationFlag, EngineError, Result};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub max_chunk_length: usize,
    pub overflow: OverflowPolicy,
    pub passes: usize,
    pub mask: String,
    pub allowed_labels: Vec<EntityLabel>,
    pub unit_suffixes: Vec<String>,
    /// Run the regex pre-pass before recognition
    pub supplementary: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_chunk_length: 126,
            overflow: OverflowPolicy::default(),
            passes: 2,
            mask: DEFAULT_MASK.to_string(),
            allowed_labels: EntityLabel::redactable().to_vec(),
            unit_suffixes: DEFAULT_UNIT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            supplementary: true,
        }
    }
}

/// Redacted document text with counters from every pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redacted {
    pub text: String,
    pub stats: RedactionStats,
}

pub struct Pipeline {
    recognizer: Arc<dyn Recognizer>,
    chunker: Chunker,
    spans: SpanRedactor,
    patterns: Option<PatternRedactor>,
    passes: usize,
}

impl Pipeline {
    pub fn new(recognizer: Arc<dyn Recognizer>, options: PipelineOptions) -> Result<Self> {
        if options.passes == 0 {
            return Err(CoreError::InvalidPassCount(options.passes).into());
        }

        let chunker = Chunker::new(options.max_chunk_length)?.with_overflow(options.overflow);
        let spans = SpanRedactor::new(options.mask.clone(), options.allowed_labels)
            .with_suffixes(options.unit_suffixes);
        let patterns = options
            .supplementary
            .then(|| PatternRedactor::new(options.mask));

        Ok(Self {
            recognizer,
            chunker,
            spans,
            patterns,
            passes: options.passes,
        })
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Redact one chunk. A recognizer error leaves the chunk exactly as it
    /// came in and is counted in `failed_chunks`.
    pub async fn redact_chunk(&self, chunk: &str, stats: &mut RedactionStats) -> String {
        stats.chunks += 1;

        let prepared = match &self.patterns {
            Some(patterns) => {
                let (text, matches) = patterns.apply(chunk);
                stats.pattern_matches += matches;
                text
            }
            None => chunk.to_string(),
        };

        match self.recognizer.recognize(&prepared).await {
            Ok(spans) => {
                let redaction = self.spans.redact(&prepared, &spans);
                tracing::debug!(
                    chars = chunk.chars().count(),
                    entities = spans.len(),
                    applied = redaction.applied,
                    "Redacted chunk"
                );
                stats.spans_redacted += redaction.applied;
                redaction.text
            }
            Err(e) => {
                tracing::warn!(
                    recognizer = self.recognizer.name(),
                    chars = chunk.chars().count(),
                    "Recognition failed, leaving chunk unredacted: {}",
                    e
                );
                stats.failed_chunks += 1;
                chunk.to_string()
            }
        }
    }

    /// Run every pass to completion
    pub async fn process(&self, paragraphs: &[String]) -> Result<Redacted> {
        self.run(paragraphs, None).await
    }

    /// Like [`Pipeline::process`], checking `cancel` before every
    /// paragraph of every pass
    pub async fn process_with_cancel(
        &self,
        paragraphs: &[String],
        cancel: &CancellationFlag,
    ) -> Result<Redacted> {
        self.run(paragraphs, Some(cancel)).await
    }

    async fn run(
        &self,
        paragraphs: &[String],
        cancel: Option<&CancellationFlag>,
    ) -> Result<Redacted> {
        let mut stats = RedactionStats {
            paragraphs: paragraphs.len(),
            ..Default::default()
        };

        let mut text = self.run_pass(paragraphs, cancel, &mut stats).await?;
        stats.passes = 1;

        for pass in 2..=self.passes {
            let document = Document::from_text(&text);
            text = self.run_pass(&document.paragraphs, cancel, &mut stats).await?;
            stats.passes = pass;
        }

        Ok(Redacted { text, stats })
    }

    async fn run_pass(
        &self,
        paragraphs: &[String],
        cancel: Option<&CancellationFlag>,
        stats: &mut RedactionStats,
    ) -> Result<String> {
        let mut redacted = Vec::with_capacity(paragraphs.len());

        for paragraph in paragraphs {
            if cancel.is_some_and(CancellationFlag::is_cancelled) {
                return Err(EngineError::Cancelled);
            }

            let mut out = String::with_capacity(paragraph.len());
            for chunk in self.chunker.chunk(paragraph) {
                out.push_str(&self.redact_chunk(&chunk, stats).await);
            }
            redacted.push(out);
        }

        Ok(join_paragraphs(&redacted))
    }
}
