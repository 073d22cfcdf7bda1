use anyhow::Context;
use byteflow_core::config::{normalize_extensions, ByteflowConfig};
use byteflow_core::ingest::{ingest_tree, IngestOptions};
use byteflow_core::JsonlCorpusStore;

use super::super::args::{IngestArgs, OutputFormat};
use super::render;
use crate::exit_codes::SUCCESS;

pub(crate) fn run(args: IngestArgs, cfg: &ByteflowConfig) -> anyhow::Result<i32> {
    let extensions = if args.extensions.is_empty() {
        cfg.image_extensions.clone()
    } else {
        normalize_extensions(&args.extensions)
    };
    if extensions.is_empty() {
        anyhow::bail!("no usable file extensions given");
    }
    let opts = IngestOptions {
        threshold: cfg.threshold,
        extensions,
    };

    let mut store = JsonlCorpusStore::open(&cfg.corpus).strict(cfg.strict_corpus);
    let summary = ingest_tree(&args.root, &args.label, &opts, &mut store)
        .with_context(|| format!("failed to ingest {}", args.root.display()))?;

    match args.format {
        OutputFormat::Text => print!("{}", render::ingest_text(args.label.trim(), &summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    // Per-file failures are reported in the summary; partial success is success.
    Ok(SUCCESS)
}
