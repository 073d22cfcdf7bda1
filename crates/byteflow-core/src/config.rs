use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::feedback::FeedbackPolicy;
use crate::fingerprint::DEFAULT_THRESHOLD;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CORPUS_FILE: &str = "memory.jsonl";
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ByteflowConfig {
    pub version: u32,
    pub corpus: PathBuf,
    pub threshold: u8,
    /// Fail on malformed corpus lines instead of skipping them.
    pub strict_corpus: bool,
    pub reinforce_on_confirm: bool,
    pub image_extensions: Vec<String>,
}

impl Default for ByteflowConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            corpus: PathBuf::from(DEFAULT_CORPUS_FILE),
            threshold: DEFAULT_THRESHOLD,
            strict_corpus: false,
            reinforce_on_confirm: true,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl ByteflowConfig {
    pub fn feedback_policy(&self) -> FeedbackPolicy {
        FeedbackPolicy {
            reinforce_on_confirm: self.reinforce_on_confirm,
        }
    }
}

pub fn load_config(path: &Path) -> Result<ByteflowConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw).map_err(|e| match e {
        ParseFailure::Yaml(source) => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Invalid(err) => err,
    })
}

/// Lower-cases extensions and strips a leading dot; blanks are dropped.
pub fn normalize_extensions<S: AsRef<str>>(exts: &[S]) -> Vec<String> {
    exts.iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

enum ParseFailure {
    Yaml(serde_yaml::Error),
    Invalid(ConfigError),
}

fn parse_config(raw: &str) -> Result<ByteflowConfig, ParseFailure> {
    let mut cfg: ByteflowConfig = serde_yaml::from_str(raw).map_err(ParseFailure::Yaml)?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ParseFailure::Invalid(ConfigError::UnsupportedVersion {
            found: cfg.version,
            supported: SUPPORTED_CONFIG_VERSION,
        }));
    }
    cfg.image_extensions = normalize_extensions(&cfg.image_extensions);
    if cfg.image_extensions.is_empty() {
        return Err(ParseFailure::Invalid(ConfigError::NoExtensions));
    }
    Ok(cfg)
}
