use std::collections::BTreeMap;

use crate::corpus::Record;
use crate::fingerprint::Fingerprint;
use crate::similarity::score;

/// Outcome of scanning a corpus for a query. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub best_label: String,
    pub best_score: f64,
    /// Position of the winning record in the corpus.
    pub best_index: usize,
    pub per_label_best: BTreeMap<String, f64>,
}

impl MatchResult {
    /// True when the query is indistinguishable from a stored exemplar.
    pub fn is_perfect(&self) -> bool {
        self.best_score >= 1.0
    }

    /// Per-label scores, highest first. Equal scores keep label order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut rows: Vec<(&str, f64)> = self
            .per_label_best
            .iter()
            .map(|(label, &s)| (label.as_str(), s))
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        rows
    }
}

/// Linear nearest-neighbour scan.
///
/// Comparisons are strict `>`: on equal scores the earliest record wins,
/// both globally and per label. Returns `None` for an empty corpus.
pub fn best_match(query: &Fingerprint, corpus: &[Record]) -> Option<MatchResult> {
    let mut best: Option<(usize, f64)> = None;
    let mut per_label_best: BTreeMap<String, f64> = BTreeMap::new();

    for (index, record) in corpus.iter().enumerate() {
        let s = score(query, &record.binary_flow);

        if best.map_or(true, |(_, top)| s > top) {
            best = Some((index, s));
        }
        match per_label_best.get_mut(&record.label) {
            Some(top) if s > *top => *top = s,
            Some(_) => {}
            None => {
                per_label_best.insert(record.label.clone(), s);
            }
        }
    }

    let (best_index, best_score) = best?;
    tracing::debug!(
        records = corpus.len(),
        labels = per_label_best.len(),
        best_index,
        best_score,
        "corpus scanned"
    );
    Some(MatchResult {
        best_label: corpus[best_index].label.clone(),
        best_score,
        best_index,
        per_label_best,
    })
}
