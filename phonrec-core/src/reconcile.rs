//! Length reconciliation of reference labels against the aligner sequence.
//!
//! Two passes, in order:
//!
//! 1. When the manual annotation has more rows than the aligner produced
//!    phones, the rows at every `0` slot of the chosen raw variant are dropped
//!    (the speaker elided those phones).
//! 2. Rows whose canonical phone is itself `0` are dropped together with the
//!    aligned phone at the same position.
//!
//! Fewer manual rows than aligned phones is never guessed at.

use crate::error::{ReconcileError, Result};
use crate::types::{DELETED, ReconciledRow, ReferenceRow, UtteranceId};

/// Merge reference rows and observed phones into equal-length records.
///
/// `raw_variant` is the chosen grammar variant with its `0` slots kept.
pub fn reconcile(
    utterance: &UtteranceId,
    raw_variant: &[String],
    observed: &[String],
    reference: Vec<ReferenceRow>,
) -> Result<Vec<ReconciledRow>> {
    let reference = if reference.len() > observed.len() {
        drop_deleted_slots(utterance, raw_variant, reference)?
    } else {
        reference
    };

    if reference.len() < observed.len() {
        return Err(ReconcileError::UnresolvableLengthDeficit {
            utterance: utterance.to_string(),
            labels: reference.len(),
            observed: observed.len(),
        }
        .into());
    }

    if reference.len() > observed.len() {
        return Err(ReconcileError::ResidualLengthMismatch {
            utterance: utterance.to_string(),
            labels: reference.len(),
            observed: observed.len(),
        }
        .into());
    }

    let rows = reference
        .into_iter()
        .zip(observed)
        .filter(|(row, _)| row.canonical != DELETED)
        .enumerate()
        .map(|(index, (row, observed))| ReconciledRow {
            index,
            canonical: row.canonical,
            observed: observed.clone(),
            label: row.label,
            start: row.start,
            end: row.end,
        })
        .collect();

    Ok(rows)
}

/// Keep the reference rows whose raw variant slot is not `0`.
fn drop_deleted_slots(
    utterance: &UtteranceId,
    raw_variant: &[String],
    reference: Vec<ReferenceRow>,
) -> Result<Vec<ReferenceRow>> {
    if raw_variant.len() != reference.len() {
        return Err(ReconcileError::VariantLengthMismatch {
            utterance: utterance.to_string(),
            variant: raw_variant.len(),
            labels: reference.len(),
        }
        .into());
    }

    let kept: Vec<_> = reference
        .into_iter()
        .zip(raw_variant)
        .filter(|(_, slot)| *slot != DELETED)
        .map(|(row, _)| row)
        .collect();

    tracing::debug!(%utterance, kept = kept.len(), "dropped deleted reference rows");

    Ok(kept)
}
