//! Bulk corpus ingestion.
//!
//! Walks a directory tree and appends one record per new image-like file.
//! Files already present in the corpus (by exact `image_path`) are skipped.
//! Per-file failures are counted and logged; they never abort the run.

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::{normalize_extensions, DEFAULT_IMAGE_EXTENSIONS};
use crate::corpus::store::CorpusStore;
use crate::corpus::{normalize_label, Record};
use crate::errors::IngestError;
use crate::fingerprint::{extract_file, DEFAULT_THRESHOLD};

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub threshold: u8,
    /// Lower-case extensions without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            extensions: normalize_extensions(DEFAULT_IMAGE_EXTENSIONS),
        }
    }
}

impl IngestOptions {
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub added: usize,
    pub skipped: usize,
    pub errored: usize,
}

pub fn ingest_tree<S: CorpusStore + ?Sized>(
    root: &Path,
    label: &str,
    opts: &IngestOptions,
    store: &mut S,
) -> Result<IngestSummary, IngestError> {
    let label = normalize_label(label).map_err(|_| IngestError::EmptyLabel)?;
    let meta = std::fs::metadata(root).map_err(|source| IngestError::Root {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(IngestError::Root {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let mut known: HashSet<String> = store
        .load()?
        .into_iter()
        .filter_map(|r| r.image_path)
        .collect();
    let mut summary = IngestSummary::default();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "failed to walk directory entry");
                summary.errored += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() || !opts.accepts(entry.path()) {
            continue;
        }

        let image_path = entry.path().to_string_lossy().into_owned();
        if known.contains(&image_path) {
            tracing::info!(path = %image_path, "already in corpus, skipped");
            summary.skipped += 1;
            continue;
        }

        match extract_file(entry.path(), opts.threshold) {
            Ok(binary_flow) => {
                let record = Record::new(&label, binary_flow)?.with_image_path(image_path.clone());
                store.append(&record)?;
                tracing::info!(label = %label, path = %image_path, "saved");
                known.insert(image_path);
                summary.added += 1;
            }
            Err(e) => {
                tracing::warn!(label = %label, path = %image_path, error = %e, "failed to fingerprint file");
                summary.errored += 1;
            }
        }
    }

    tracing::info!(
        label = %label,
        added = summary.added,
        skipped = summary.skipped,
        errored = summary.errored,
        "ingestion finished"
    );
    Ok(summary)
}
