//! Manual reference label files.
//!
//! One file per utterance, one row per annotated position with columns
//! `index canonical manual label start end`. The index column is ignored and
//! rows are taken in file order.

use crate::error::{Error, ReferenceError, Result};
use crate::types::{ReferenceRow, UtteranceId};
use std::path::{Path, PathBuf};

/// Columns of a reference row.
const COLUMNS: usize = 6;

/// Directory holding each speaker's label files.
pub const LABELS_DIR: &str = "labels";

/// Location of an utterance's reference file: `<root>/<speaker>/labels/<utterance>.txt`.
pub fn reference_path(root: &Path, utterance: &UtteranceId) -> Result<PathBuf> {
    let speaker = utterance.speaker()?;

    Ok(root
        .join(speaker)
        .join(LABELS_DIR)
        .join(format!("{utterance}.txt")))
}

/// Read a reference label file.
pub fn read_reference(path: &Path) -> Result<Vec<ReferenceRow>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    parse_reference(&content, path)
}

/// Parse reference rows, skipping blank lines.
///
/// `path` only labels errors.
pub fn parse_reference(content: &str, path: &Path) -> Result<Vec<ReferenceRow>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| -> Result<ReferenceRow> {
            let fields: Vec<&str> = line.split_whitespace().collect();

            match fields[..] {
                [_, canonical, manual, label, start, end, ..] => Ok(ReferenceRow {
                    canonical: canonical.to_string(),
                    manual: manual.to_string(),
                    label: label.to_string(),
                    start: start.to_string(),
                    end: end.to_string(),
                }),
                _ => Err(ReferenceError::TooFewColumns {
                    path: path.to_path_buf(),
                    line: i + 1,
                    expected: COLUMNS,
                    got: fields.len(),
                }
                .into()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_file_order() {
        let content = "1 DH DH 1 0.10 0.14\n2 AH0 AX 0 0.14 0.20\n\n3 K K 1 0.20 0.25\n";
        let rows = parse_reference(content, Path::new("ref.txt")).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].canonical, "AH0");
        assert_eq!(rows[1].manual, "AX");
        assert_eq!(rows[1].label, "0");
        assert_eq!(rows[2].start, "0.20");
        assert_eq!(rows[2].end, "0.25");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rows = parse_reference("1 T T 1 0 1 extra\n", Path::new("ref.txt")).unwrap();
        assert_eq!(rows[0].end, "1");
    }

    #[test]
    fn rejects_short_row() {
        let err = parse_reference("1 T T 1 0.1 0.2\n2 D D 1\n", Path::new("ref.txt")).unwrap_err();

        assert!(matches!(
            err,
            Error::Reference(ReferenceError::TooFewColumns { line: 2, got: 4, .. })
        ));
    }

    #[test]
    fn builds_speaker_label_path() {
        let path = reference_path(Path::new("/data"), &UtteranceId::new("spkr3_14")).unwrap();
        assert_eq!(path, Path::new("/data/spkr3/labels/spkr3_14.txt"));
    }
}
