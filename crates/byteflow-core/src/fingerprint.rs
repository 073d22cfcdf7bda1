//! Structural fingerprint of a byte stream.
//!
//! Each adjacent byte pair contributes one bit: `1` when the two bytes differ
//! by more than the threshold, `0` otherwise. No format-aware decoding is
//! done; an image is just its raw bytes.

use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

use crate::errors::{ExtractError, FingerprintValueError};

pub const DEFAULT_THRESHOLD: u8 = 5;

/// Binary transition vector. Every element is `0` or `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<u8>")]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of set transitions.
    pub fn ones(&self) -> usize {
        self.0.iter().filter(|&&b| b == 1).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Fingerprint {
    type Error = FingerprintValueError;

    fn try_from(bits: Vec<u8>) -> Result<Self, Self::Error> {
        if let Some((position, &value)) = bits.iter().enumerate().find(|(_, &b)| b > 1) {
            return Err(FingerprintValueError { position, value });
        }
        Ok(Self(bits))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.0)
    }
}

/// Extracts the transition fingerprint of `data`.
///
/// Output length is `data.len() - 1` (empty for inputs shorter than two bytes).
pub fn extract(data: &[u8], threshold: u8) -> Fingerprint {
    Fingerprint(
        data.windows(2)
            .map(|w| u8::from(w[1].abs_diff(w[0]) > threshold))
            .collect(),
    )
}

pub fn extract_file(path: &Path, threshold: u8) -> Result<Fingerprint, ExtractError> {
    let data = std::fs::read(path).map_err(|source| ExtractError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract(&data, threshold))
}
