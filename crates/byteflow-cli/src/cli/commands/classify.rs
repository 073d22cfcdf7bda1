use anyhow::Context;
use byteflow_core::config::ByteflowConfig;
use byteflow_core::{Classifier, JsonlCorpusStore, Outcome, Verdict};

use super::super::args::{ClassifyArgs, OutputFormat};
use super::prompt::{self, FeedbackPrompt};
use super::render;
use crate::exit_codes::SUCCESS;

pub(crate) fn run(args: ClassifyArgs, cfg: &ByteflowConfig) -> anyhow::Result<i32> {
    let mut feedback = prompt::for_stdin();
    run_with_prompt(args, cfg, feedback.as_mut())
}

pub(crate) fn run_with_prompt(
    args: ClassifyArgs,
    cfg: &ByteflowConfig,
    prompt: &mut dyn FeedbackPrompt,
) -> anyhow::Result<i32> {
    let store = JsonlCorpusStore::open(&cfg.corpus).strict(cfg.strict_corpus);
    let mut classifier = Classifier::new(store)
        .with_threshold(cfg.threshold)
        .with_policy(cfg.feedback_policy());

    let classification = classifier
        .classify_file(&args.input)
        .with_context(|| format!("failed to classify {}", args.input.display()))?;
    let Some(classification) = classification else {
        eprintln!(
            "Corpus {} is empty; ingest labelled files first.",
            cfg.corpus.display()
        );
        return Ok(SUCCESS);
    };
    let result = &classification.result;

    match args.format {
        OutputFormat::Text => print!("{}", render::classification_text(&args.input, result)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render::classification_json(&args.input, result))?
        ),
    }

    if args.no_feedback {
        return Ok(SUCCESS);
    }

    let verdict = match &args.verdict {
        Some(v) => Verdict::parse(v),
        None => Verdict::parse(&prompt.verdict()?),
    };
    let correct_label = match (&verdict, args.label) {
        (Verdict::Reject, Some(label)) => Some(label),
        (Verdict::Reject, None) => Some(prompt.correct_label()?),
        _ => None,
    };

    let outcome = classifier
        .learn(&classification, &verdict, correct_label.as_deref())
        .context("failed to update corpus")?;

    let label = correct_label.as_deref().map(str::trim).unwrap_or_default();
    match outcome {
        Outcome::Reinforced { stored: true } => eprintln!(
            "Confirmed. Stored as another '{}' exemplar.",
            result.best_label
        ),
        Outcome::Reinforced { stored: false } => eprintln!("Confirmed. Corpus unchanged."),
        Outcome::Corrected => eprintln!(
            "Relabelled record #{} from '{}' to '{label}'.",
            result.best_index, result.best_label
        ),
        Outcome::Appended => eprintln!("Corpus updated with new exemplar '{label}'."),
        Outcome::Rejected => eprintln!("Invalid input. Skipping learning."),
    }
    Ok(SUCCESS)
}
