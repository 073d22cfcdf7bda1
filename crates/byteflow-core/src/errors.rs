use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a byte source into a fingerprint.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid fingerprint payload (anything other than 0/1 values).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("fingerprint value at position {position} is {value}, expected 0 or 1")]
pub struct FingerprintValueError {
    pub position: usize,
    pub value: u8,
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus line {line} in {}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("label must not be empty")]
    EmptyLabel,

    #[error("record index {index} out of range (corpus has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("ingestion root {} is not a readable directory: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("label must not be empty")]
    EmptyLabel,

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("image_extensions must not be empty")]
    NoExtensions,
}
