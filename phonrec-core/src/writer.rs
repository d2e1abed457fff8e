//! Reconciled label files.
//!
//! Row format: `<utterance>_<index> <canonical> <observed> <label> <start> <end>`.

use crate::error::{Error, OutputError, Result};
use crate::types::{ReconciledRow, UtteranceId};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Subdirectory of the output root holding the label files.
pub const OUTPUT_DIR: &str = "labels_with_kaldi_phones";

/// Location of an utterance's label file: `<root>/labels_with_kaldi_phones/<speaker>/<utterance>.txt`.
pub fn label_path(root: &Path, utterance: &UtteranceId) -> Result<PathBuf> {
    let speaker = utterance.speaker()?;

    Ok(root
        .join(OUTPUT_DIR)
        .join(speaker)
        .join(format!("{utterance}.txt")))
}

/// Format rows as label file content.
pub fn format_rows(utterance: &UtteranceId, rows: &[ReconciledRow]) -> String {
    rows.iter().fold(String::new(), |mut out, row| {
        let _ = writeln!(
            out,
            "{utterance}_{} {} {} {} {} {}",
            row.index, row.canonical, row.observed, row.label, row.start, row.end
        );
        out
    })
}

/// Write an utterance's rows, creating the speaker directory when needed.
///
/// Returns the path written.
pub fn write_labels(
    root: &Path,
    utterance: &UtteranceId,
    rows: &[ReconciledRow],
) -> Result<PathBuf> {
    let path = label_path(root, utterance)?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| OutputError::DirectoryCreation {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(&path, format_rows(utterance, rows)).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = ?path.display(), rows = rows.len(), "wrote labels");

    Ok(path)
}

/// Read a label file back into rows.
pub fn read_labels(path: &Path) -> Result<Vec<ReconciledRow>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    parse_labels(&content)
}

/// Parse label file content, skipping blank lines.
pub fn parse_labels(content: &str) -> Result<Vec<ReconciledRow>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| -> Result<ReconciledRow> {
            let malformed = || OutputError::MalformedLabelRow {
                line: i + 1,
                text: line.to_string(),
            };

            let fields: Vec<&str> = line.split_whitespace().collect();
            let [key, canonical, observed, label, start, end] = fields.as_slice() else {
                return Err(malformed().into());
            };

            let index = key
                .rsplit_once('_')
                .and_then(|(_, index)| index.parse().ok())
                .ok_or_else(malformed)?;

            Ok(ReconciledRow {
                index,
                canonical: canonical.to_string(),
                observed: observed.to_string(),
                label: label.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            })
        })
        .collect()
}
