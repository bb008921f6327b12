//! Output writer
//!
//! Each redacted document lands in the output directory as
//! `<token>_<file name>.<ext>`, where the token is 8 random alphanumeric
//! characters. With basenames turned off the name is the token alone.

use desens_core::Payload;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{Result, StorageError};

const TOKEN_LEN: usize = 8;
const MAX_ATTEMPTS: usize = 16;

pub struct OutputWriter {
    dir: PathBuf,
    keep_basename: bool,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keep_basename: true,
        }
    }

    pub fn with_basename(mut self, keep: bool) -> Self {
        self.keep_basename = keep;
        self
    }

    pub fn file_name_for(&self, source: &Path, token: &str, extension: &str) -> String {
        let basename = source.file_name().map(|n| n.to_string_lossy());
        match basename {
            Some(name) if self.keep_basename => format!("{}_{}.{}", token, name, extension),
            _ => format!("{}.{}", token, extension),
        }
    }

    /// Write the payload under a fresh name; never overwrites an existing file
    pub async fn write(&self, source: &Path, payload: &Payload, extension: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        for _ in 0..MAX_ATTEMPTS {
            let path = self
                .dir
                .join(self.file_name_for(source, &random_token(), extension));

            let file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            write_or_remove(file, &path, payload.as_bytes()).await?;

            tracing::debug!(
                source = %source.display(),
                output = %path.display(),
                bytes = payload.as_bytes().len(),
                "Wrote output"
            );
            return Ok(path);
        }

        Err(StorageError::NameCollision(self.dir.display().to_string()))
    }
}

/// Write `bytes` through `file`. On failure the partial file at `path`
/// is removed.
async fn write_or_remove<W: AsyncWrite + Unpin>(
    mut file: W,
    path: &Path,
    bytes: &[u8],
) -> std::io::Result<()> {
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        if let Err(remove) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), "Failed to remove partial output: {}", remove);
        }
        return Err(e);
    }

    Ok(())
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
