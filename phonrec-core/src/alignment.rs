//! Forced-aligner output parsing.
//!
//! Only lines whose second field is `phones` are read. The rest of such a line
//! is a flat list of decorated `(phone, start_frame, duration)` triples:
//!
//! ```text
//! spkr1_3 phones [('SIL', 0, 31), ('DH_B', 31, 4), ('AH0_E', 35, 6)]
//! ```
//!
//! Phone tokens are normalized to bare phone identities: decoration is
//! stripped, a `_X` word-position tag is cut and a trailing stress digit is
//! dropped.

use crate::error::{AlignmentError, Error, Result};
use crate::types::{TimedPhone, UtteranceId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Field type marking a phone alignment line.
pub const PHONES_FIELD: &str = "phones";

/// Fields per aligned phone: name, start frame, duration.
const PHONE_STRIDE: usize = 3;

/// Characters the aligner wraps around tuple fields.
const DECORATION: &[char] = &['[', ']', '(', ')', '\'', '"', ','];

/// Silence and noise markers that are not phones of the sentence.
const NON_PHONES: &[&str] = &["", "sil", "SIL", "sp", "SP", "[key]", "[KEY]", "key", "KEY"];

/// Stress markers stripped before matching against the grammar.
const STRESS_DIGITS: &[char] = &['0', '1', '2'];

/// Normalize a raw aligner phone token to its bare phone.
pub fn normalize_phone(token: &str) -> String {
    let mut phone: String = token.chars().filter(|c| !DECORATION.contains(c)).collect();

    if phone.contains('_') {
        let cut = phone
            .char_indices()
            .rev()
            .nth(1)
            .map_or(0, |(i, _)| i);
        phone.truncate(cut);
    }

    if phone.ends_with(|c: char| c.is_ascii_digit()) {
        phone.pop();
    }

    phone
}

/// Drop silence markers and leftover stress digits from aligned phone names.
pub fn observed_phones<S: AsRef<str>>(phones: &[S]) -> Vec<String> {
    phones
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !NON_PHONES.contains(p))
        .map(|p| p.strip_suffix(STRESS_DIGITS).unwrap_or(p).to_string())
        .collect()
}

/// Phone lines of aligner output as `(line number, utterance, payload fields)`.
fn phone_lines(content: &str) -> impl Iterator<Item = (usize, UtteranceId, Vec<&str>)> {
    content.lines().enumerate().filter_map(|(i, line)| {
        let mut fields = line.split_whitespace();
        let utterance = fields.next()?;

        if fields.next()? != PHONES_FIELD {
            return None;
        }

        Some((i + 1, UtteranceId::new(utterance), fields.collect()))
    })
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::read(path, e))
}

/// Normalized phone names per utterance.
#[derive(Clone, Debug, Default)]
pub struct PhoneAlignments {
    phones: HashMap<UtteranceId, Vec<String>>,
}

impl PhoneAlignments {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let alignments = Self::parse(&read(path)?);

        tracing::info!(
            path = ?path.display(),
            utterances = alignments.len(),
            "loaded phone alignments"
        );

        Ok(alignments)
    }

    /// Read the phone names of every `phones` line, one every three fields.
    pub fn parse(content: &str) -> Self {
        let mut phones = HashMap::new();

        for (_, utterance, fields) in phone_lines(content) {
            let names = fields
                .iter()
                .step_by(PHONE_STRIDE)
                .map(|token| normalize_phone(token))
                .collect::<Vec<_>>();

            if phones.insert(utterance.clone(), names).is_some() {
                tracing::warn!(%utterance, "repeated alignment, keeping the last one");
            }
        }

        Self { phones }
    }

    pub fn get(&self, utterance: &UtteranceId) -> Option<&[String]> {
        self.phones.get(utterance).map(Vec::as_slice)
    }

    /// Observed sequence of an utterance with silences removed.
    pub fn observed(&self, utterance: &UtteranceId) -> Result<Vec<String>> {
        self.get(utterance)
            .map(observed_phones)
            .ok_or_else(|| AlignmentError::MissingAlignment(utterance.to_string()).into())
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }
}

/// Phones with frame boundaries per utterance, ordered by utterance id.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct TimedAlignments {
    phones: BTreeMap<UtteranceId, Vec<TimedPhone>>,
}

impl TimedAlignments {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let alignments = Self::parse(&read(path)?)?;

        tracing::info!(
            path = ?path.display(),
            utterances = alignments.len(),
            "loaded timed alignments"
        );

        Ok(alignments)
    }

    /// Read every `phones` line as whole `(phone, start, duration)` triples.
    pub fn parse(content: &str) -> Result<Self> {
        let mut phones = BTreeMap::new();

        for (line, utterance, fields) in phone_lines(content) {
            if fields.len() % PHONE_STRIDE != 0 {
                return Err(AlignmentError::IncompleteTriple {
                    utterance: utterance.to_string(),
                    line,
                }
                .into());
            }

            let frame = |token: &str| -> Result<u64> {
                let value = token.replace(DECORATION, "");
                value.parse().map_err(|_| {
                    AlignmentError::InvalidFrame {
                        utterance: utterance.to_string(),
                        line,
                        value,
                    }
                    .into()
                })
            };

            let timed = fields
                .chunks_exact(PHONE_STRIDE)
                .map(|triple| -> Result<TimedPhone> {
                    let start = frame(triple[1])?;
                    let duration = frame(triple[2])?;
                    let end = start.checked_add(duration).ok_or_else(|| {
                        AlignmentError::FrameOverflow {
                            utterance: utterance.to_string(),
                            line,
                            start,
                            duration,
                        }
                    })?;
                    Ok(TimedPhone::new(normalize_phone(triple[0]), start, end))
                })
                .collect::<Result<Vec<_>>>()?;

            if phones.insert(utterance.clone(), timed).is_some() {
                tracing::warn!(%utterance, "repeated alignment, keeping the last one");
            }
        }

        Ok(Self { phones })
    }

    pub fn get(&self, utterance: &UtteranceId) -> Option<&[TimedPhone]> {
        self.phones.get(utterance).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UtteranceId, &[TimedPhone])> {
        self.phones.iter().map(|(u, p)| (u, p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
spkr1_3 words [('the', 31, 10)]
spkr1_3 phones [('SIL', 0, 31), ('DH_B', 31, 4), ('AH0_E', 35, 6), ('K_B', 41, 5)]
spkr2_3 phones [('SIL', 0, 12)]
";

    fn utt(id: &str) -> UtteranceId {
        UtteranceId::new(id)
    }

    #[test]
    fn normalizes_decorated_tokens() {
        assert_eq!(normalize_phone("[('SIL',"), "SIL");
        assert_eq!(normalize_phone("('DH_B',"), "DH");
        assert_eq!(normalize_phone("('AH0_E',"), "AH");
        assert_eq!(normalize_phone("'ER1'"), "ER");
        assert_eq!(normalize_phone("('[key]',"), "key");
        assert_eq!(normalize_phone("T"), "T");
    }

    #[test]
    fn filters_silence_and_stress() {
        let phones = ["SIL", "DH", "AH2", "sp", "", "key", "K"];
        assert_eq!(observed_phones(&phones), ["DH", "AH", "K"]);
    }

    #[test]
    fn parses_phone_names_at_stride() {
        let alignments = PhoneAlignments::parse(OUTPUT);

        assert_eq!(alignments.len(), 2);
        assert_eq!(
            alignments.get(&utt("spkr1_3")).unwrap(),
            ["SIL", "DH", "AH", "K"]
        );
        assert_eq!(alignments.observed(&utt("spkr1_3")).unwrap(), ["DH", "AH", "K"]);
        assert!(alignments.observed(&utt("spkr2_3")).unwrap().is_empty());
    }

    #[test]
    fn missing_utterance_is_an_error() {
        let alignments = PhoneAlignments::parse(OUTPUT);
        let err = alignments.observed(&utt("spkr9_3")).unwrap_err();

        assert!(matches!(
            err,
            Error::Alignment(AlignmentError::MissingAlignment(ref id)) if id == "spkr9_3"
        ));
    }

    #[test]
    fn skips_short_and_foreign_lines() {
        let alignments = PhoneAlignments::parse("lonely\n\nspkr1_3 words a 1 2\n");
        assert!(alignments.is_empty());
    }

    #[test]
    fn repeated_utterance_keeps_last() {
        let content = "u_1 phones ('A', 0, 1)\nu_1 phones ('B', 0, 1)\n";
        let alignments = PhoneAlignments::parse(content);

        assert_eq!(alignments.get(&utt("u_1")).unwrap(), ["B"]);
    }

    #[test]
    fn parses_timed_phones() {
        let alignments = TimedAlignments::parse(OUTPUT).unwrap();
        let phones = alignments.get(&utt("spkr1_3")).unwrap();

        assert_eq!(phones.len(), 4);
        assert_eq!(phones[0], TimedPhone::new("SIL", 0, 31));
        assert_eq!(phones[2], TimedPhone::new("AH", 35, 41));
    }

    #[test]
    fn timed_iteration_is_ordered() {
        let alignments = TimedAlignments::parse(OUTPUT).unwrap();
        let ids: Vec<_> = alignments.iter().map(|(u, _)| u.as_str()).collect();

        assert_eq!(ids, ["spkr1_3", "spkr2_3"]);
    }

    #[test]
    fn rejects_bad_frame() {
        let err = TimedAlignments::parse("u_1 phones ('A', x, 1)\n").unwrap_err();

        assert!(matches!(
            err,
            Error::Alignment(AlignmentError::InvalidFrame { line: 1, ref value, .. }) if value == "x"
        ));
    }

    #[test]
    fn rejects_end_frame_overflow() {
        let content = "u_1 phones ('A', 0, 3), ('B', 18446744073709551615, 5)\n";
        let err = TimedAlignments::parse(content).unwrap_err();

        let Error::Alignment(AlignmentError::FrameOverflow {
            utterance,
            line,
            start,
            duration,
        }) = &err
        else {
            panic!("expected frame overflow, got {err:?}");
        };

        assert_eq!(utterance, "u_1");
        assert_eq!((*line, *start, *duration), (1, u64::MAX, 5));
    }

    #[test]
    fn accepts_end_frame_at_limit() {
        let alignments =
            TimedAlignments::parse("u_1 phones ('A', 18446744073709551610, 5)\n").unwrap();
        let phones = alignments.get(&utt("u_1")).unwrap();

        assert_eq!(phones[0].end, u64::MAX);
    }

    #[test]
    fn rejects_incomplete_triple() {
        let err = TimedAlignments::parse("u_1 phones ('A', 0, 1), ('B', 1)\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Alignment(AlignmentError::IncompleteTriple { .. })
        ));
    }
}
