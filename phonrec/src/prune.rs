//! Prune subcommand - drop allophonic variants from a transcription grammar.

use eyre::{Context, Result};
use phonrec_core::grammar::prune_allophones;
use std::path::PathBuf;

/// File name of the pruned grammar next to its source.
const PRUNED_FILE_NAME: &str = "transcriptionsSAE.txt";

/// CLI arguments for grammar pruning.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Transcription grammar to prune
    pub path: PathBuf,

    /// Output path (default: transcriptionsSAE.txt next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolved configuration for grammar pruning.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub output: PathBuf,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let output = args
            .output
            .unwrap_or_else(|| args.path.with_file_name(PRUNED_FILE_NAME));

        Ok(Self {
            path: args.path,
            output,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    tracing::info!(
        input = ?config.path.display(),
        output = ?config.output.display(),
        "pruning transcriptions"
    );

    let content = std::fs::read_to_string(&config.path)
        .wrap_err_with(|| format!("failed to read transcriptions: {:?}", config.path.display()))?;

    std::fs::write(&config.output, prune_allophones(&content))
        .wrap_err_with(|| format!("failed to write: {:?}", config.output.display()))?;

    Ok(())
}
