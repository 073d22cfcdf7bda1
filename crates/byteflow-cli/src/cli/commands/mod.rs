use anyhow::Context;
use byteflow_core::config::{load_config, ByteflowConfig};

use super::args::*;
use crate::exit_codes::SUCCESS;

pub(crate) mod classify;
pub(crate) mod ingest;
pub(crate) mod prompt;
pub(crate) mod render;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Classify(args) => classify::run(args, &resolve_settings(&cli.global)?),
        Command::Ingest(args) => ingest::run(args, &resolve_settings(&cli.global)?),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Config file (if any), then flag/env overrides on top.
pub(crate) fn resolve_settings(global: &GlobalArgs) -> anyhow::Result<ByteflowConfig> {
    let mut cfg = match &global.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ByteflowConfig::default(),
    };
    if let Some(corpus) = &global.corpus {
        cfg.corpus = corpus.clone();
    }
    if let Some(threshold) = global.threshold {
        cfg.threshold = threshold;
    }
    tracing::debug!(
        corpus = %cfg.corpus.display(),
        threshold = cfg.threshold,
        strict = cfg.strict_corpus,
        "settings resolved"
    );
    Ok(cfg)
}
