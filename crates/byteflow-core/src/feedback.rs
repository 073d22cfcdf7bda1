//! Verdict-driven corpus updates.
//!
//! [`decide`] is pure: it maps a human verdict and a [`MatchResult`] to a
//! [`Decision`]. [`apply`] performs that decision against a store. Each
//! classification results in at most one mutation.

use crate::corpus::store::CorpusStore;
use crate::corpus::{normalize_label, Record};
use crate::errors::CorpusError;
use crate::fingerprint::Fingerprint;
use crate::matcher::MatchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Prediction confirmed (`y`).
    Confirm,
    /// Prediction rejected (`n`).
    Reject,
    /// Anything else, kept verbatim for logging.
    Other(String),
}

impl Verdict {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" => Verdict::Confirm,
            "n" => Verdict::Reject,
            _ => Verdict::Other(input.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackPolicy {
    /// Store the query as an extra exemplar when a non-perfect prediction is
    /// confirmed.
    pub reinforce_on_confirm: bool,
}

impl Default for FeedbackPolicy {
    fn default() -> Self {
        Self {
            reinforce_on_confirm: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Append the query under the confirmed label.
    Reinforce { label: String },
    /// Confirmed, nothing to store.
    Keep,
    /// Relabel the perfect-match exemplar at `index`.
    Correct { index: usize, label: String },
    /// Append the query under the corrected label.
    Append { label: String },
    /// No learning.
    Ignore { reason: String },
}

/// Terminal state of one feedback round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reinforced { stored: bool },
    Corrected,
    Appended,
    Rejected,
}

pub fn decide(
    verdict: &Verdict,
    result: &MatchResult,
    correct_label: Option<&str>,
    policy: &FeedbackPolicy,
) -> Decision {
    match verdict {
        Verdict::Confirm => {
            if result.is_perfect() || !policy.reinforce_on_confirm {
                Decision::Keep
            } else {
                Decision::Reinforce {
                    label: result.best_label.clone(),
                }
            }
        }
        Verdict::Reject => {
            let label = match correct_label.map(normalize_label) {
                Some(Ok(label)) => label,
                _ => {
                    return Decision::Ignore {
                        reason: "no corrected label supplied".to_string(),
                    }
                }
            };
            if result.is_perfect() {
                Decision::Correct {
                    index: result.best_index,
                    label,
                }
            } else {
                Decision::Append { label }
            }
        }
        Verdict::Other(raw) => Decision::Ignore {
            reason: format!("unrecognised verdict {raw:?}"),
        },
    }
}

pub fn apply<S: CorpusStore + ?Sized>(
    decision: &Decision,
    query: &Fingerprint,
    store: &mut S,
) -> Result<Outcome, CorpusError> {
    match decision {
        Decision::Reinforce { label } => {
            store.append(&Record::new(label, query.clone())?)?;
            tracing::info!(label = %label, "prediction confirmed, exemplar added");
            Ok(Outcome::Reinforced { stored: true })
        }
        Decision::Keep => {
            tracing::info!("prediction confirmed, corpus unchanged");
            Ok(Outcome::Reinforced { stored: false })
        }
        Decision::Correct { index, label } => {
            let mut records = store.load()?;
            let len = records.len();
            let target = records
                .get_mut(*index)
                .ok_or(CorpusError::IndexOutOfRange { index: *index, len })?;
            tracing::info!(
                index,
                from = %target.label,
                to = %label,
                "relabelling perfect-match exemplar"
            );
            target.label = label.clone();
            store.rewrite(&records)?;
            Ok(Outcome::Corrected)
        }
        Decision::Append { label } => {
            store.append(&Record::new(label, query.clone())?)?;
            tracing::info!(label = %label, "corrected exemplar added");
            Ok(Outcome::Appended)
        }
        Decision::Ignore { reason } => {
            tracing::info!(reason = %reason, "skipping learning");
            Ok(Outcome::Rejected)
        }
    }
}
