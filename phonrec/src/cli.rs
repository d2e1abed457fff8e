//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::Result;

#[derive(Debug, Parser)]
#[command(name = "phonrec")]
#[command(about = "Reconcile transcription grammars, forced alignments and manual phone labels")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build per-utterance label files with the aligner's phones
    Labels(crate::labels::Args),

    /// Export aligned phones with frame boundaries as JSON
    Timings(crate::timings::Args),

    /// Write a copy of the transcription grammar without allophonic variants
    Prune(crate::prune::Args),
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Labels(args) => crate::labels::execute(args.try_into()?),
        Commands::Timings(args) => crate::timings::execute(args.try_into()?),
        Commands::Prune(args) => crate::prune::execute(args.try_into()?),
    }
}
