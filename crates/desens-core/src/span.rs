use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity categories relevant to redaction.
///
/// Recognizers report their own tag sets (MSRA-style `NR`/`NS`/`NT`,
/// CoNLL-style `PER`/`LOC`/`ORG`, or spelled-out names). Those are mapped
/// onto the three redactable labels; anything else is kept verbatim as
/// `Other` and never matches an allowed-label set built from the config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Person,
    Location,
    Organization,
    Other(String),
}

impl EntityLabel {
    /// Map a recognizer-specific tag onto the label set
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "PERSON" | "PER" | "NR" => Self::Person,
            "LOCATION" | "LOC" | "NS" => Self::Location,
            "ORGANIZATION" | "ORG" | "NT" => Self::Organization,
            _ => Self::Other(code.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "PERSON",
            Self::Location => "LOCATION",
            Self::Organization => "ORGANIZATION",
            Self::Other(code) => code,
        }
    }

    /// The three labels redacted out of the box
    pub fn redactable() -> [EntityLabel; 3] {
        [Self::Person, Self::Location, Self::Organization]
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EntityLabel {
    fn from(code: &str) -> Self {
        Self::from_code(code)
    }
}

impl From<String> for EntityLabel {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

/// A recognized entity inside one chunk.
///
/// `start`/`end` are half-open character offsets (Unicode scalar values,
/// not bytes) into the chunk the recognizer was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(
        text: impl Into<String>,
        label: impl Into<EntityLabel>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
