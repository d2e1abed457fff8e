//! Labels subcommand - reconcile manual labels with aligner phones.

use color_eyre::Section;
use eyre::{Context, Result, eyre};
use phonrec_core::alignment::PhoneAlignments;
use phonrec_core::grammar::Grammar;
use phonrec_core::pipeline::{LabelPipeline, OnError, read_utterance_list};
use std::path::PathBuf;
use std::time::Instant;

/// CLI arguments for label generation.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Transcription grammar with TEXT and TRANSCRIPTION lines
    #[arg(short, long)]
    pub transcriptions: PathBuf,

    /// List of utterances to process, one id per line
    #[arg(short, long)]
    pub utterance_list: PathBuf,

    /// Root of the manual labels (<root>/<speaker>/labels/<utterance>.txt)
    #[arg(short, long)]
    pub reference_root: PathBuf,

    /// Forced aligner output with `phones` lines
    #[arg(short, long)]
    pub alignments: PathBuf,

    /// Output root for labels_with_kaldi_phones/
    #[arg(short, long)]
    pub output_root: PathBuf,

    /// Skip failing utterances instead of stopping at the first one
    #[arg(long)]
    pub keep_going: bool,
}

/// Resolved configuration for label generation.
#[derive(Debug)]
pub struct Config {
    pub transcriptions: PathBuf,
    pub utterance_list: PathBuf,
    pub reference_root: PathBuf,
    pub alignments: PathBuf,
    pub output_root: PathBuf,
    pub on_error: OnError,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        if !args.reference_root.is_dir() {
            return Err(eyre!(
                "reference root is not a directory: {:?}",
                args.reference_root.display()
            ));
        }

        Ok(Self {
            transcriptions: args.transcriptions,
            utterance_list: args.utterance_list,
            reference_root: args.reference_root,
            alignments: args.alignments,
            output_root: args.output_root,
            on_error: if args.keep_going {
                OnError::KeepGoing
            } else {
                OnError::Abort
            },
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let s = Instant::now();

    let grammar = Grammar::from_file(&config.transcriptions).wrap_err_with(|| {
        format!(
            "failed to load transcriptions: {:?}",
            config.transcriptions.display()
        )
    })?;

    let alignments = PhoneAlignments::from_file(&config.alignments).wrap_err_with(|| {
        format!("failed to load alignments: {:?}", config.alignments.display())
    })?;

    let utterances = read_utterance_list(&config.utterance_list).wrap_err_with(|| {
        format!(
            "failed to load utterance list: {:?}",
            config.utterance_list.display()
        )
    })?;

    tracing::info!(
        utterances = utterances.len(),
        output_root = ?config.output_root.display(),
        "building labels"
    );

    let pipeline = LabelPipeline::new(grammar, alignments, config.reference_root);

    let summary = pipeline
        .run(&utterances, &config.output_root, config.on_error)
        .wrap_err("label generation stopped")
        .suggestion("rerun with --keep-going to process the remaining utterances")?;

    tracing::info!(
        written = summary.written.len(),
        duration = %format!("{:.2}s", s.elapsed().as_secs_f32()),
        "labels written"
    );

    if !summary.failed.is_empty() {
        let failed = summary
            .failed
            .iter()
            .map(|(utterance, e)| format!("{utterance}: {e}"))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(eyre!(
            "{} of {} utterances failed",
            summary.failed.len(),
            utterances.len()
        )
        .with_note(|| failed));
    }

    Ok(())
}
