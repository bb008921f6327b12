//! Input discovery: a single file or every eligible file under a directory

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::reader::extension_of;
use crate::{Denylist, ReadError, Result};

pub struct FileEnumerator {
    extensions: Vec<String>,
    denylist: Denylist,
    recursive: bool,
}

impl FileEnumerator {
    /// Accept files with the given extensions (case-insensitive, no dot).
    /// Lock files (`~$*`) and hidden files are excluded by default.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            denylist: Denylist::new(["~$*", ".*"]),
            recursive: true,
        }
    }

    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.denylist = Denylist::new(patterns);
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Extension accepted and file name not excluded
    pub fn is_eligible(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if let Some(pattern) = self.denylist.matching_pattern(name) {
            tracing::debug!(path = %path.display(), pattern, "Excluded by pattern");
            return false;
        }
        extension_of(path)
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Eligible files in sorted order.
    ///
    /// A file input yields itself when eligible, otherwise nothing.
    pub fn enumerate(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if !input.exists() {
            return Err(ReadError::NotFound(input.display().to_string()));
        }

        if input.is_file() {
            return Ok(if self.is_eligible(input) {
                vec![input.to_path_buf()]
            } else {
                tracing::debug!(path = %input.display(), "Input file is not eligible");
                Vec::new()
            });
        }

        let mut walker = WalkDir::new(input).follow_links(true);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded_dir(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_eligible(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        tracing::debug!(input = %input.display(), count = files.len(), "Enumerated input files");
        Ok(files)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.denylist.is_denied(name))
                .unwrap_or(false)
    }
}
