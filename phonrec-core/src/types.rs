//! Core types for phonrec-core

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Grammar value marking an optional slot that may be elided in speech.
pub const DELETED: &str = "0";

/// Delimiter between speaker and sentence in an utterance id.
const UTTERANCE_DELIMITER: char = '_';

/// Identifier of a scripted sentence, shared by grammar entries and reference files.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentenceId(String);

impl SentenceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one recorded performance, formatted `speaker_sentence`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UtteranceId(String);

impl UtteranceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into speaker and sentence at the first delimiter.
    pub fn split(&self) -> Result<(&str, SentenceId)> {
        match self.0.split_once(UTTERANCE_DELIMITER) {
            Some((speaker, sentence)) if !speaker.is_empty() && !sentence.is_empty() => {
                Ok((speaker, SentenceId::new(sentence)))
            }
            _ => Err(Error::InvalidUtteranceId(self.0.clone())),
        }
    }

    /// Speaker prefix of the id.
    pub fn speaker(&self) -> Result<&str> {
        self.split().map(|(speaker, _)| speaker)
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One manually annotated position of a reference label file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceRow {
    /// Phone prescribed by the grammar
    pub canonical: String,
    /// Phone the annotator heard
    pub manual: String,
    /// Correctness label
    pub label: String,
    /// Start time, kept verbatim
    pub start: String,
    /// End time, kept verbatim
    pub end: String,
}

/// Final per-phone record written to a label file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconciledRow {
    pub index: usize,
    pub canonical: String,
    pub observed: String,
    pub label: String,
    pub start: String,
    pub end: String,
}

/// Aligner phone with frame boundaries, `end = start + duration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimedPhone {
    pub phone: String,
    pub start: u64,
    pub end: u64,
}

impl TimedPhone {
    pub fn new(phone: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            phone: phone.into(),
            start,
            end,
        }
    }

    /// Whether the aligner gave this phone any frames at all.
    pub fn is_uttered(&self) -> bool {
        self.start != self.end
    }
}

/// Render phones as fixed-width cells for diagnostic output.
pub fn format_phones<S: AsRef<str>>(phones: &[S]) -> String {
    phones
        .iter()
        .map(|p| format!("{:>3}", p.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
