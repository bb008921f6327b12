//! Batch job over a file or directory
//!
//! Files are processed one at a time. Per-file failures are reported and
//! skipped; only an input with no eligible files ends the batch with an
//! error. A stop request is honored before the next file or paragraph;
//! files already written stay on disk and the in-flight file is dropped.

use desens_core::{RedactionResult, RedactionStatus};
use desens_sources::{FileEnumerator, ReadError, ReaderRegistry};
use desens_storage::{OutputWriter, Sink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{CancellationFlag, EngineError, Pipeline, Result};

#[derive(Debug, Clone)]
pub enum JobEvent {
    Started {
        total: usize,
    },
    FileDone {
        path: PathBuf,
        status: RedactionStatus,
        output: PathBuf,
        completed: usize,
        total: usize,
    },
    FileSkipped {
        path: PathBuf,
        reason: String,
        completed: usize,
        total: usize,
    },
    Finished {
        message: String,
        success: bool,
    },
}

#[derive(Debug, Clone)]
pub struct FileReport {
    /// Status and stats; the payload is released once written
    pub result: RedactionResult,
    /// Written file, absent when the input was skipped
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct JobReport {
    pub files: Vec<FileReport>,
    pub completed: usize,
    pub total: usize,
    pub cancelled: bool,
    pub message: String,
    pub success: bool,
}

impl JobReport {
    pub fn redacted(&self) -> usize {
        self.files.iter().filter(|f| f.output.is_some()).count()
    }

    pub fn partial(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.result.status == RedactionStatus::Partial)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.result.status == RedactionStatus::Failed)
            .count()
    }
}

pub struct Job {
    pipeline: Pipeline,
    readers: ReaderRegistry,
    enumerator: FileEnumerator,
    sink: Arc<dyn Sink>,
    writer: OutputWriter,
}

impl Job {
    pub fn new(
        pipeline: Pipeline,
        enumerator: FileEnumerator,
        sink: Arc<dyn Sink>,
        writer: OutputWriter,
    ) -> Self {
        Self {
            pipeline,
            readers: ReaderRegistry::new(),
            enumerator,
            sink,
            writer,
        }
    }

    /// Run on a background task. Events arrive on the returned channel,
    /// ending with [`JobEvent::Finished`].
    pub fn spawn(self, input: impl Into<PathBuf>) -> (JobHandle, mpsc::UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationFlag::new();
        let input = input.into();

        let flag = cancel.clone();
        let task = tokio::spawn(async move { self.run(&input, &flag, &tx).await });

        (JobHandle { cancel, task }, rx)
    }

    pub async fn run(
        &self,
        input: &Path,
        cancel: &CancellationFlag,
        events: &mpsc::UnboundedSender<JobEvent>,
    ) -> Result<JobReport> {
        match self.run_batch(input, cancel, events).await {
            Ok(report) => {
                tracing::info!(
                    completed = report.completed,
                    total = report.total,
                    cancelled = report.cancelled,
                    "{}",
                    report.message
                );
                send(
                    events,
                    JobEvent::Finished {
                        message: report.message.clone(),
                        success: report.success,
                    },
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Batch failed: {}", e);
                send(
                    events,
                    JobEvent::Finished {
                        message: e.to_string(),
                        success: false,
                    },
                );
                Err(e)
            }
        }
    }

    async fn run_batch(
        &self,
        input: &Path,
        cancel: &CancellationFlag,
        events: &mpsc::UnboundedSender<JobEvent>,
    ) -> Result<JobReport> {
        let files = self.enumerator.enumerate(input)?;
        if files.is_empty() {
            return Err(EngineError::NoEligibleFiles(input.display().to_string()));
        }

        let total = files.len();
        tracing::info!(
            input = %input.display(),
            total,
            recognizer = self.pipeline.recognizer_name(),
            passes = self.pipeline.passes(),
            "Starting redaction"
        );
        send(events, JobEvent::Started { total });

        let mut reports = Vec::with_capacity(total);
        let mut completed = 0;
        let mut cancelled = false;

        for path in files {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            match self.redact_file(&path, cancel).await {
                Ok(report) => {
                    completed += 1;
                    send(
                        events,
                        JobEvent::FileDone {
                            path: path.clone(),
                            status: report.result.status,
                            output: report.output.clone().unwrap_or_default(),
                            completed,
                            total,
                        },
                    );
                    reports.push(report);
                }
                Err(EngineError::Cancelled) => {
                    tracing::info!(path = %path.display(), "Stopped mid-file, output discarded");
                    cancelled = true;
                    break;
                }
                Err(e) => {
                    completed += 1;
                    tracing::warn!(path = %path.display(), "Skipping file: {}", e);
                    send(
                        events,
                        JobEvent::FileSkipped {
                            path: path.clone(),
                            reason: e.to_string(),
                            completed,
                            total,
                        },
                    );
                    reports.push(FileReport {
                        result: RedactionResult::failed(path, e),
                        output: None,
                    });
                }
            }
        }

        let redacted = reports.iter().filter(|r| r.output.is_some()).count();
        let (message, success) = if cancelled {
            (
                format!(
                    "Stopped by request after {} of {} files ({} redacted)",
                    completed, total, redacted
                ),
                false,
            )
        } else if redacted == 0 {
            (format!("All {} files failed", total), false)
        } else {
            (format!("Redacted {} of {} files", redacted, total), true)
        };

        Ok(JobReport {
            files: reports,
            completed,
            total,
            cancelled,
            message,
            success,
        })
    }

    /// Read, redact, seal and write one file
    pub async fn redact_file(&self, path: &Path, cancel: &CancellationFlag) -> Result<FileReport> {
        let document = self.readers.read(path).await?;
        if document.is_blank() {
            return Err(ReadError::Empty(path.display().to_string()).into());
        }

        let redacted = self
            .pipeline
            .process_with_cancel(&document.paragraphs, cancel)
            .await?;

        let mut result = RedactionResult::completed(
            path.to_path_buf(),
            self.sink.seal(&redacted.text)?,
            redacted.stats,
        );
        let output = self.store(&mut result).await?;

        Ok(FileReport { result, output })
    }

    /// Write the result's payload and release it
    async fn store(&self, result: &mut RedactionResult) -> Result<Option<PathBuf>> {
        let Some(payload) = result.take_payload() else {
            return Ok(None);
        };

        let output = self
            .writer
            .write(&result.source, &payload, self.sink.extension())
            .await?;

        tracing::info!(
            path = %result.source.display(),
            output = %output.display(),
            spans = result.stats.spans_redacted,
            failed_chunks = result.stats.failed_chunks,
            "Redacted file"
        );
        Ok(Some(output))
    }
}

/// Control side of a spawned [`Job`]
pub struct JobHandle {
    cancel: CancellationFlag,
    task: JoinHandle<Result<JobReport>>,
}

impl JobHandle {
    /// Ask the job to stop before its next file or paragraph
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn wait(self) -> Result<JobReport> {
        self.task
            .await
            .map_err(|e| EngineError::Task(e.to_string()))?
    }
}

fn send(events: &mpsc::UnboundedSender<JobEvent>, event: JobEvent) {
    // The receiver may have gone away; the job still runs to completion
    let _ = events.send(event);
}
