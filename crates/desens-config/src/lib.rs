use anyhow::{Context, bail};
use desens_core::{EntityLabel, OverflowPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for desens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,

    #[serde(default)]
    pub recognizer: RecognizerConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Characters per recognizer call
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    #[serde(default)]
    pub overflow: OverflowPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(default = "default_mask")]
    pub mask: String,

    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    #[serde(default = "default_unit_suffixes")]
    pub unit_suffixes: Vec<String>,

    #[serde(default = "default_passes")]
    pub passes: usize,

    #[serde(default = "default_true")]
    pub supplementary: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    #[default]
    Http,
    Lexicon,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizerConfig {
    #[serde(default)]
    pub kind: RecognizerKind,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub lexicon: LexiconConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub token: String,

    #[serde(default = "default_entities_key")]
    pub entities_key: String,

    /// 0 disables the timeout
    #[serde(default)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns matched against file names
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default = "default_true")]
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub keep_basename: bool,

    #[serde(default)]
    pub encrypt: bool,

    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            mask: default_mask(),
            labels: default_labels(),
            unit_suffixes: default_unit_suffixes(),
            passes: default_passes(),
            supplementary: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: String::new(),
            entities_key: default_entities_key(),
            timeout_secs: 0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
            recursive: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            keep_basename: true,
            encrypt: false,
            key_file: default_key_file(),
        }
    }
}

fn default_max_length() -> usize {
    126
}

fn default_mask() -> String {
    "**".to_string()
}

fn default_labels() -> Vec<String> {
    EntityLabel::redactable()
        .iter()
        .map(|label| label.as_str().to_string())
        .collect()
}

fn default_unit_suffixes() -> Vec<String> {
    ["局", "公司", "工程", "省", "市", "县", "区", "街道", "社区", "小区", "花园", "苑"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_passes() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_url() -> String {
    "http://comdo.hanlp.com/hanlp/v21/ner/ner".to_string()
}

fn default_entities_key() -> String {
    "ner/msra".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["docx".to_string(), "doc".to_string(), "pdf".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["~$*".to_string(), ".*".to_string()]
}

fn default_key_file() -> PathBuf {
    PathBuf::from("desens.key")
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(config)
        }
    }

    /// Load an explicit config file; it must exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "desens", "desens") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.desens/config.toml")
        }
    }

    /// Allowed labels, mapped from recognizer codes
    pub fn labels(&self) -> Vec<EntityLabel> {
        self.redaction
            .labels
            .iter()
            .map(|code| EntityLabel::from_code(code))
            .collect()
    }

    /// Check values after CLI overrides have been applied
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunking.max_length == 0 {
            bail!("chunking.max_length must be greater than zero");
        }
        if self.redaction.passes == 0 {
            bail!("redaction.passes must be at least 1");
        }
        if self.redaction.mask.is_empty() {
            bail!("redaction.mask must not be empty");
        }
        if let Some(label) = self
            .labels()
            .iter()
            .find(|label| matches!(label, EntityLabel::Other(_)))
        {
            bail!(
                "redaction.labels: unknown label '{}' (expected PERSON, LOCATION or ORGANIZATION)",
                label
            );
        }
        if self.input.extensions.is_empty() {
            bail!("input.extensions must list at least one extension");
        }

        match self.recognizer.kind {
            RecognizerKind::Http if self.recognizer.http.url.trim().is_empty() => {
                bail!("recognizer.http.url must be set")
            }
            RecognizerKind::Lexicon if self.recognizer.lexicon.path.is_none() => {
                bail!("recognizer.lexicon.path must be set for the lexicon recognizer")
            }
            _ => {}
        }

        Ok(())
    }
}
