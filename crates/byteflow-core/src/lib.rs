pub mod classify;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod feedback;
pub mod fingerprint;
pub mod ingest;
pub mod matcher;
pub mod similarity;

pub use classify::{Classification, Classifier};
pub use corpus::store::{CorpusStore, JsonlCorpusStore, MemoryCorpusStore};
pub use corpus::Record;
pub use feedback::{Decision, FeedbackPolicy, Outcome, Verdict};
pub use fingerprint::Fingerprint;
pub use matcher::MatchResult;
