//! Labelled fingerprint records and their persistence.

pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CorpusError;
use crate::fingerprint::Fingerprint;

/// One labelled exemplar.
///
/// Field order matches the on-disk line layout: `label`, optional
/// `image_path`, then `binary_flow`. Unknown fields are carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub binary_flow: Fingerprint,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(label: &str, binary_flow: Fingerprint) -> Result<Self, CorpusError> {
        Ok(Self {
            label: normalize_label(label)?,
            image_path: None,
            binary_flow,
            extra: Map::new(),
        })
    }

    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }
}

/// Trims `label`, rejecting labels that are empty afterwards.
pub fn normalize_label(label: &str) -> Result<String, CorpusError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CorpusError::EmptyLabel);
    }
    Ok(trimmed.to_string())
}

/// Parses a single corpus line, enforcing the non-empty label invariant.
pub(crate) fn parse_line(line: &str) -> Result<Record, String> {
    let record: Record = serde_json::from_str(line).map_err(|e| e.to_string())?;
    if record.label.trim().is_empty() {
        return Err("label is empty".to_string());
    }
    Ok(record)
}
