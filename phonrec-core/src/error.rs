//! Error types for phonrec-core organized by processing stage.

use std::path::PathBuf;
use thiserror::Error;

/// Reconciliation error variants organized by processing stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Grammar parsing stage error
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// Aligner output stage error
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    /// Reference label stage error
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Variant selection stage error
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Length reconciliation stage error
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Label output stage error
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Utterance id without a speaker prefix
    #[error("invalid utterance id {0:?}: expected `speaker_sentence`")]
    InvalidUtteranceId(String),

    /// IO error while reading an input file
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Transcription grammar errors.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// Slot with an empty phone choice, e.g. `AX//K` or a trailing `/`
    #[error("malformed slot {slot:?} on grammar line {line}: {text:?}")]
    MalformedGrammarLine {
        line: usize,
        slot: String,
        text: String,
    },
}

/// Forced-aligner output errors.
#[derive(Debug, Error)]
pub enum AlignmentError {
    /// Utterance from the driving list absent from the aligner output
    #[error("missing alignment for {0}")]
    MissingAlignment(String),

    /// Non-numeric frame field in a timed phone triple
    #[error("invalid frame value {value:?} for {utterance} on alignment line {line}")]
    InvalidFrame {
        utterance: String,
        line: usize,
        value: String,
    },

    /// Start plus duration past the largest representable frame
    #[error("frame overflow for {utterance} on alignment line {line}: {start} + {duration}")]
    FrameOverflow {
        utterance: String,
        line: usize,
        start: u64,
        duration: u64,
    },

    /// Phone line whose fields do not split into whole triples
    #[error("incomplete phone triple for {utterance} on alignment line {line}")]
    IncompleteTriple { utterance: String, line: usize },
}

/// Reference label file errors.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Row with fewer than the fixed column count
    #[error("{path:?} line {line}: expected {expected} columns, got {got}")]
    TooFewColumns {
        path: PathBuf,
        line: usize,
        expected: usize,
        got: usize,
    },
}

/// Variant selection errors.
#[derive(Debug, Error)]
pub enum MatchError {
    /// No grammar variant has the observed sequence's length
    #[error(
        "{utterance} does not match any transcription of sentence {sentence}\n  observed: {observed}\n  candidates: {candidates}"
    )]
    NoLengthMatchingVariant {
        utterance: String,
        sentence: String,
        observed: String,
        candidates: String,
    },
}

/// Length reconciliation errors.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Manual labels shorter than the aligner sequence
    #[error("aligner sequence is longer than manual annotation for {utterance} ({labels} < {observed})")]
    UnresolvableLengthDeficit {
        utterance: String,
        labels: usize,
        observed: usize,
    },

    /// Chosen raw variant cannot be walked in lockstep with the labels
    #[error("chosen transcription for {utterance} has {variant} slots but {labels} labels")]
    VariantLengthMismatch {
        utterance: String,
        variant: usize,
        labels: usize,
    },

    /// Manual labels still longer than the aligner sequence after dropping deletions
    #[error("{utterance} keeps {labels} labels for {observed} aligned phones after removing deletions")]
    ResidualLengthMismatch {
        utterance: String,
        labels: usize,
        observed: usize,
    },
}

/// Label writing errors.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output directory could not be created
    #[error("failed to create directory {path:?}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Label file could not be written
    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Label row that does not follow `<utterance>_<index> canonical observed label start end`
    #[error("malformed label row {line}: {text:?}")]
    MalformedLabelRow { line: usize, text: String },
}

/// Result type alias for phonrec-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
