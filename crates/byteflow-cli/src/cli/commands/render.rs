use byteflow_core::ingest::IngestSummary;
use byteflow_core::MatchResult;
use serde_json::json;
use std::fmt::Write;
use std::path::Path;

pub(crate) fn classification_text(input: &Path, result: &MatchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "===== CLASSIFICATION =====");
    let _ = writeln!(out, "Input : {}", input.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "Similarity per label:");
    for (label, score) in result.ranked() {
        let _ = writeln!(out, "  {label:<12} -> {score:.3}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Predicted  : {}", result.best_label);
    let _ = writeln!(out, "Confidence : {:.3}", result.best_score);
    out
}

pub(crate) fn classification_json(input: &Path, result: &MatchResult) -> serde_json::Value {
    let scores: Vec<_> = result
        .ranked()
        .into_iter()
        .map(|(label, score)| json!({ "label": label, "score": score }))
        .collect();
    json!({
        "input": input.display().to_string(),
        "predicted": result.best_label,
        "confidence": result.best_score,
        "best_index": result.best_index,
        "scores": scores,
    })
}

pub(crate) fn ingest_text(label: &str, summary: &IngestSummary) -> String {
    format!(
        "===== SUMMARY =====\nLabel   : {label}\nAdded   : {}\nSkipped : {}\nErrored : {}\n",
        summary.added, summary.skipped, summary.errored
    )
}
