//! Shared argument types used across multiple commands.

use clap::ValueEnum;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings accepted by every subcommand. Flags and env override the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Optional YAML config (version, corpus, threshold, ...)
    #[arg(long, global = true, env = "BYTEFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Corpus file (newline-delimited JSON)
    /// Default: memory.jsonl
    #[arg(long, global = true, env = "BYTEFLOW_CORPUS")]
    pub corpus: Option<PathBuf>,

    /// Byte-difference threshold for a transition bit
    /// Default: 5
    #[arg(long, global = true, env = "BYTEFLOW_THRESHOLD")]
    pub threshold: Option<u8>,
}
