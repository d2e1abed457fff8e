//! Timings subcommand - export aligned phones with frame boundaries.

use eyre::{Context, Result};
use phonrec_core::alignment::TimedAlignments;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// CLI arguments for timing export.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Forced aligner output with `phones` lines
    pub alignments: PathBuf,

    /// Output JSON path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolved configuration for timing export.
#[derive(Debug)]
pub struct Config {
    pub alignments: PathBuf,
    pub output: Option<PathBuf>,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        Ok(Self {
            alignments: args.alignments,
            output: args.output,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let alignments = TimedAlignments::from_file(&config.alignments).wrap_err_with(|| {
        format!("failed to load alignments: {:?}", config.alignments.display())
    })?;

    let (phones, unuttered) = frame_counts(&alignments);
    tracing::info!(
        utterances = alignments.len(),
        phones,
        unuttered,
        "parsed timed alignments"
    );

    match config.output {
        Some(path) => {
            tracing::info!(path = ?path.display(), "write timings");

            let file = File::create(&path)
                .wrap_err_with(|| format!("failed to create {:?}", path.display()))?;
            write_json(BufWriter::new(file), &alignments)
                .wrap_err_with(|| format!("failed to write timings: {:?}", path.display()))
        }
        None => write_json(std::io::stdout().lock(), &alignments),
    }
}

/// Total phones and phones the aligner gave no frames.
fn frame_counts(alignments: &TimedAlignments) -> (usize, usize) {
    alignments
        .iter()
        .flat_map(|(_, phones)| phones)
        .fold((0, 0), |(total, empty), phone| {
            (total + 1, empty + usize::from(!phone.is_uttered()))
        })
}

fn write_json<W: Write>(mut writer: W, alignments: &TimedAlignments) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, alignments)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
