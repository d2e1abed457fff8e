//! Per-utterance label pipeline.
//!
//! The grammar and the aligner output are loaded once and only read while
//! utterances are processed, so a [`LabelPipeline`] can be shared between
//! workers that handle different utterances.

use crate::alignment::PhoneAlignments;
use crate::error::{Error, MatchError, Result};
use crate::grammar::{Grammar, Variants};
use crate::matcher::best_variant;
use crate::reconcile::reconcile;
use crate::reference::{read_reference, reference_path};
use crate::types::{ReconciledRow, ReferenceRow, UtteranceId, format_phones};
use crate::writer::write_labels;
use std::path::{Path, PathBuf};

/// What a batch run does when an utterance fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnError {
    /// Stop at the first failing utterance
    #[default]
    Abort,
    /// Log the failure and continue with the next utterance
    KeepGoing,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Label files written
    pub written: Vec<PathBuf>,
    /// Utterances skipped in keep-going mode, with their errors
    pub failed: Vec<(UtteranceId, Error)>,
}

/// Read a driving list: the first field of each non-blank line is an utterance id.
pub fn read_utterance_list(path: &Path) -> Result<Vec<UtteranceId>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    Ok(parse_utterance_list(&content))
}

pub fn parse_utterance_list(content: &str) -> Vec<UtteranceId> {
    content
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(UtteranceId::new)
        .collect()
}

/// Grammar and aligner lookups plus the reference label location.
#[derive(Debug)]
pub struct LabelPipeline {
    grammar: Grammar,
    alignments: PhoneAlignments,
    reference_root: PathBuf,
}

impl LabelPipeline {
    pub fn new(grammar: Grammar, alignments: PhoneAlignments, reference_root: PathBuf) -> Self {
        Self {
            grammar,
            alignments,
            reference_root,
        }
    }

    /// Build the reconciled rows of one utterance.
    pub fn reconcile_utterance(&self, utterance: &UtteranceId) -> Result<Vec<ReconciledRow>> {
        let (speaker, sentence) = utterance.split()?;
        let observed = self.alignments.observed(utterance)?;
        let path = reference_path(&self.reference_root, utterance)?;

        tracing::info!(
            speaker,
            %sentence,
            text = self.grammar.text(&sentence).map(|w| w.join(" ")).unwrap_or_default(),
            path = ?path.display(),
            "reconciling utterance"
        );

        let reference = read_reference(&path)?;
        let variants = self.grammar.variants(&sentence);

        let chosen = variants.and_then(|v| v.get(best_variant(v.clean(), &observed)?));

        let Some((raw, clean)) = chosen else {
            return Err(MatchError::NoLengthMatchingVariant {
                utterance: utterance.to_string(),
                sentence: sentence.to_string(),
                observed: format_phones(&observed),
                candidates: describe_candidates(variants),
            }
            .into());
        };

        log_sequences(
            variants.map_or(0, Variants::len),
            clean,
            raw,
            &observed,
            &reference,
        );

        reconcile(utterance, raw, &observed, reference)
    }

    /// Reconcile one utterance and write its label file under `output_root`.
    pub fn write_utterance(&self, utterance: &UtteranceId, output_root: &Path) -> Result<PathBuf> {
        let rows = self.reconcile_utterance(utterance)?;
        write_labels(output_root, utterance, &rows)
    }

    /// Process a driving list in order.
    pub fn run(
        &self,
        utterances: &[UtteranceId],
        output_root: &Path,
        on_error: OnError,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for utterance in utterances {
            match self.write_utterance(utterance, output_root) {
                Ok(path) => summary.written.push(path),
                Err(e) if on_error == OnError::KeepGoing => {
                    tracing::error!(%utterance, error = %e, "skipping utterance");
                    summary.failed.push((utterance.clone(), e));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            written = summary.written.len(),
            failed = summary.failed.len(),
            "label run finished"
        );

        Ok(summary)
    }
}

fn describe_candidates(variants: Option<&Variants>) -> String {
    match variants {
        Some(v) if !v.is_empty() => v
            .clean()
            .iter()
            .map(|c| format!("[{}]", c.join(" ")))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "none".to_string(),
    }
}

fn log_sequences(
    count: usize,
    clean: &[String],
    raw: &[String],
    observed: &[String],
    reference: &[ReferenceRow],
) {
    let column = |f: fn(&ReferenceRow) -> &String| reference.iter().map(f).collect::<Vec<_>>();

    tracing::debug!(
        "chosen out of {count} transcriptions\n  \
         reference:   {}\n  \
         aligned:     {}\n  \
         label:       {}\n  \
         with zeros:  {}\n  \
         manual:      {}\n  \
         annotated:   {}",
        format_phones(clean),
        format_phones(observed),
        format_phones(&column(|r| &r.label)),
        format_phones(raw),
        format_phones(&column(|r| &r.manual)),
        format_phones(&column(|r| &r.canonical)),
    );
}
