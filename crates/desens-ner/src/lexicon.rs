//! Local dictionary recognizer
//!
//! Matches a fixed list of names without any model or network access.
//! Useful for known case participants and offline runs.
//!
//! ```toml
//! [[entries]]
//! text = "孙中山"
//! label = "PERSON"
//!
//! [[entries]]
//! text = "连云港市审计局"
//! label = "NT"
//! ```

use async_trait::async_trait;
use desens_core::{EntityLabel, TextSpan};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{RecognitionError, Recognizer, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Default, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    entries: Vec<LexiconEntry>,
}

pub struct LexiconRecognizer {
    /// `None` when the lexicon is empty
    pattern: Option<Regex>,
    labels: HashMap<String, EntityLabel>,
}

impl LexiconRecognizer {
    pub fn new(entries: Vec<LexiconEntry>) -> Result<Self> {
        let mut labels = HashMap::new();
        for entry in entries {
            if entry.text.is_empty() {
                continue;
            }
            // First definition of a term wins
            labels
                .entry(entry.text)
                .or_insert_with(|| EntityLabel::from_code(&entry.label));
        }

        // Longest terms first: the leftmost-first alternation then prefers
        // "连云港市审计局" over "连云港"
        let mut terms: Vec<&String> = labels.keys().collect();
        terms.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let pattern = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|term| regex::escape(term))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation).map_err(|e| RecognitionError::Lexicon(e.to_string()))?)
        };

        Ok(Self { pattern, labels })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: LexiconFile =
            toml::from_str(content).map_err(|e| RecognitionError::Lexicon(e.to_string()))?;
        Self::new(file.entries)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Non-overlapping matches, left to right, with character offsets
    pub fn find(&self, text: &str) -> Vec<TextSpan> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        let mut spans = Vec::new();
        let mut last_byte = 0;
        let mut char_pos = 0;

        for m in pattern.find_iter(text) {
            char_pos += text[last_byte..m.start()].chars().count();
            let len = m.as_str().chars().count();

            if let Some(label) = self.labels.get(m.as_str()) {
                spans.push(TextSpan::new(
                    m.as_str(),
                    label.clone(),
                    char_pos,
                    char_pos + len,
                ));
            }

            char_pos += len;
            last_byte = m.end();
        }

        spans
    }
}

#[async_trait]
impl Recognizer for LexiconRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<TextSpan>> {
        Ok(self.find(text))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
