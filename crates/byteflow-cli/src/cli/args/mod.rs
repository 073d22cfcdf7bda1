use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub use common::*;

#[derive(Parser, Debug)]
#[command(
    name = "byteflow",
    version,
    about = "Feedback-corrected nearest-neighbour classifier for binary files"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a file against the corpus and learn from your verdict
    Classify(ClassifyArgs),
    /// Recursively add image files under a directory with one label
    Ingest(IngestArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// File to classify (raw bytes are used, no decoding)
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Answer the verdict prompt up front: y (correct) or n (incorrect)
    #[arg(long)]
    pub verdict: Option<String>,

    /// Corrected label, used with an `n` verdict
    #[arg(long)]
    pub label: Option<String>,

    /// Report only; never prompt or touch the corpus
    #[arg(long, conflicts_with_all = ["verdict", "label"])]
    pub no_feedback: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct IngestArgs {
    /// Directory to walk
    pub root: PathBuf,

    /// Label assigned to every new file
    #[arg(long)]
    pub label: String,

    /// File extensions to include (repeatable). Defaults to the configured list.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
