use std::path::Path;

use crate::corpus::store::CorpusStore;
use crate::errors::ClassifyError;
use crate::feedback::{apply, decide, Decision, FeedbackPolicy, Outcome, Verdict};
use crate::fingerprint::{extract, extract_file, Fingerprint, DEFAULT_THRESHOLD};
use crate::matcher::{best_match, MatchResult};

/// A scored query, waiting for a verdict.
#[derive(Debug, Clone)]
pub struct Classification {
    pub query: Fingerprint,
    pub result: MatchResult,
}

/// Classification session bound to one corpus store.
pub struct Classifier<S> {
    store: S,
    threshold: u8,
    policy: FeedbackPolicy,
}

impl<S: CorpusStore> Classifier<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            threshold: DEFAULT_THRESHOLD,
            policy: FeedbackPolicy::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_policy(mut self, policy: FeedbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Scores the file at `path` against the corpus.
    ///
    /// Returns `Ok(None)` without reading the file when the corpus is empty.
    pub fn classify_file(&self, path: &Path) -> Result<Option<Classification>, ClassifyError> {
        let corpus = self.store.load()?;
        if corpus.is_empty() {
            tracing::info!("corpus is empty, nothing to compare against");
            return Ok(None);
        }
        let query = extract_file(path, self.threshold)?;
        tracing::debug!(
            path = %path.display(),
            bits = query.len(),
            ones = query.ones(),
            "query fingerprint extracted"
        );
        Ok(best_match(&query, &corpus).map(|result| Classification { query, result }))
    }

    pub fn classify_bytes(&self, data: &[u8]) -> Result<Option<Classification>, ClassifyError> {
        let corpus = self.store.load()?;
        if corpus.is_empty() {
            tracing::info!("corpus is empty, nothing to compare against");
            return Ok(None);
        }
        let query = extract(data, self.threshold);
        Ok(best_match(&query, &corpus).map(|result| Classification { query, result }))
    }

    pub fn decide(
        &self,
        classification: &Classification,
        verdict: &Verdict,
        correct_label: Option<&str>,
    ) -> Decision {
        decide(verdict, &classification.result, correct_label, &self.policy)
    }

    /// Applies a human verdict to the corpus.
    pub fn learn(
        &mut self,
        classification: &Classification,
        verdict: &Verdict,
        correct_label: Option<&str>,
    ) -> Result<Outcome, ClassifyError> {
        let decision = self.decide(classification, verdict, correct_label);
        Ok(apply(&decision, &classification.query, &mut self.store)?)
    }
}
