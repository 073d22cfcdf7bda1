use byteflow_core::{Classifier, JsonlCorpusStore, Outcome, Verdict};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Fingerprints (threshold 5): x=[1,0,0,0], y=[0,1,1,0], w=[1,1,0,1]
const CORPUS: &str = "\
{\"label\": \"x\", \"binary_flow\": [1, 0, 0, 0]}
{\"label\":\"y\",\"image_path\":\"imgs/y.jpg\",\"binary_flow\":[0,1,1,0]}
{\"label\": \"w\", \"binary_flow\": [1, 1, 0, 1]}
";

const EXACT_W: [u8; 5] = [0, 50, 0, 0, 80];
const NEAR_W: [u8; 5] = [0, 50, 0, 0, 0];

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("memory.jsonl");
    fs::write(&corpus, CORPUS).unwrap();
    (dir, corpus)
}

fn write_query(dir: &Path, bytes: &[u8]) -> std::path::PathBuf {
    let p = dir.join("query.png");
    fs::write(&p, bytes).unwrap();
    p
}

#[test]
fn reject_on_perfect_match_relabels_only_that_line() {
    let (dir, corpus) = setup();
    let query = write_query(dir.path(), &EXACT_W);
    let mut classifier = Classifier::new(JsonlCorpusStore::open(&corpus));

    let c = classifier.classify_file(&query).unwrap().unwrap();
    assert_eq!(c.result.best_label, "w");
    assert_eq!(c.result.best_index, 2);
    assert_eq!(c.result.best_score, 1.0);

    let outcome = classifier.learn(&c, &Verdict::Reject, Some("z")).unwrap();
    assert_eq!(outcome, Outcome::Corrected);

    let after = fs::read_to_string(&corpus).unwrap();
    let after: Vec<_> = after.lines().collect();
    let before: Vec<_> = CORPUS.lines().collect();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[1]);
    assert_eq!(after[2], r#"{"label":"z","binary_flow":[1,1,0,1]}"#);
}

#[test]
fn reject_on_near_match_appends() {
    let (dir, corpus) = setup();
    let query = write_query(dir.path(), &NEAR_W);
    let mut classifier = Classifier::new(JsonlCorpusStore::open(&corpus));

    let c = classifier.classify_file(&query).unwrap().unwrap();
    assert!(!c.result.is_perfect());
    classifier.learn(&c, &Verdict::Reject, Some("z")).unwrap();

    let text = fs::read_to_string(&corpus).unwrap();
    assert!(text.starts_with(CORPUS));
    assert_eq!(text.lines().count(), 4);
    assert_eq!(
        text.lines().last().unwrap(),
        r#"{"label":"z","binary_flow":[1,1,0,0]}"#
    );
}

#[test]
fn confirm_on_near_match_reinforces_best_label() {
    let (dir, corpus) = setup();
    let query = write_query(dir.path(), &NEAR_W);
    let mut classifier = Classifier::new(JsonlCorpusStore::open(&corpus));

    let c = classifier.classify_file(&query).unwrap().unwrap();
    let label = c.result.best_label.clone();
    let outcome = classifier.learn(&c, &Verdict::Confirm, None).unwrap();
    assert_eq!(outcome, Outcome::Reinforced { stored: true });

    let text = fs::read_to_string(&corpus).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text
        .lines()
        .last()
        .unwrap()
        .starts_with(&format!("{{\"label\":\"{label}\"")));
}

#[test]
fn unrecognised_verdict_leaves_file_untouched() {
    let (dir, corpus) = setup();
    for bytes in [&EXACT_W, &NEAR_W] {
        let query = write_query(dir.path(), bytes);
        let mut classifier = Classifier::new(JsonlCorpusStore::open(&corpus));
        let c = classifier.classify_file(&query).unwrap().unwrap();
        let outcome = classifier
            .learn(&c, &Verdict::parse("perhaps"), Some("z"))
            .unwrap();
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(fs::read(&corpus).unwrap(), CORPUS.as_bytes());
    }
}

#[test]
fn relabel_after_skipped_line_targets_loaded_record_and_drops_bad_line() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("memory.jsonl");
    let x_line = "{\"label\": \"x\", \"binary_flow\": [1, 0, 0, 0]}";
    let w_line = "{\"label\":\"w\",\"binary_flow\":[1,1,0,1]}";
    fs::write(&corpus, format!("{{not json\n{x_line}\n{w_line}\n")).unwrap();
    let query = write_query(dir.path(), &EXACT_W);
    let mut classifier = Classifier::new(JsonlCorpusStore::open(&corpus));

    let c = classifier.classify_file(&query).unwrap().unwrap();
    assert_eq!(c.result.best_label, "w");
    assert_eq!(c.result.best_index, 1);
    assert!(c.result.is_perfect());

    let outcome = classifier.learn(&c, &Verdict::Reject, Some("z")).unwrap();
    assert_eq!(outcome, Outcome::Corrected);

    let after = fs::read_to_string(&corpus).unwrap();
    let after: Vec<_> = after.lines().collect();
    assert_eq!(
        after,
        [x_line, r#"{"label":"z","binary_flow":[1,1,0,1]}"#]
    );
}
