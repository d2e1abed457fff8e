//! Transcription grammar expansion.
//!
//! A grammar file holds, per sentence, a `TEXT` line with the words of the
//! sentence and one or more `TRANSCRIPTION` lines with one slot per position.
//! Each slot lists the allowed phones separated by `/`, and the `0` phone marks
//! a slot that may be dropped entirely:
//!
//! ```text
//! TEXT 12: the cat
//! TRANSCRIPTION 12: DH AX/AH0 K AE T/0
//! ```
//!
//! Every transcription line is expanded into the cartesian product of its
//! slots. Expansion is exponential in the number of multi-choice slots; real
//! grammars have few choices per slot, and no bound is enforced.

use crate::error::{Error, GrammarError, Result};
use crate::types::{DELETED, SentenceId};
use std::collections::HashMap;
use std::path::Path;

const TEXT_DIRECTIVE: &str = "TEXT";
const TRANSCRIPTION_DIRECTIVE: &str = "TRANSCRIPTION";

/// Textual substitutions that collapse allophonic alternatives.
const ALLOPHONE_PRUNING: &[(&str, &str)] = &[
    ("Th/", ""),
    ("Kh/", ""),
    ("Ph/", ""),
    ("AX", "AH0"),
    ("/DX", ""),
];

/// Concrete phone sequences of one sentence.
///
/// `raw` keeps the `0` placeholders, `clean` is the same list with the
/// placeholders removed. Both are index-aligned.
#[derive(Clone, Debug, Default)]
pub struct Variants {
    raw: Vec<Vec<String>>,
    clean: Vec<Vec<String>>,
}

impl Variants {
    fn extend(&mut self, raw: Vec<Vec<String>>) {
        self.clean.extend(raw.iter().map(|v| strip_deleted(v)));
        self.raw.extend(raw);
    }

    pub fn raw(&self) -> &[Vec<String>] {
        &self.raw
    }

    pub fn clean(&self) -> &[Vec<String>] {
        &self.clean
    }

    /// Raw and clean forms of the variant at `index`.
    pub fn get(&self, index: usize) -> Option<(&[String], &[String])> {
        Some((self.raw.get(index)?, self.clean.get(index)?))
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Expanded grammar, keyed by sentence.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    variants: HashMap<SentenceId, Variants>,
    text: HashMap<SentenceId, Vec<String>>,
}

impl Grammar {
    /// Read and expand a grammar file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let grammar = Self::parse(&content)?;

        tracing::info!(
            path = ?path.display(),
            sentences = grammar.sentence_count(),
            variants = grammar.variants.values().map(Variants::len).sum::<usize>(),
            "loaded transcription grammar"
        );

        Ok(grammar)
    }

    /// Expand grammar text.
    ///
    /// Lines with fewer than three fields are ignored, as are directives other
    /// than `TEXT` and `TRANSCRIPTION`. Repeated transcription lines for a
    /// sentence add variants, a repeated `TEXT` line replaces the words.
    pub fn parse(content: &str) -> Result<Self> {
        let mut grammar = Self::default();

        for (number, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();

            if fields.len() < 3 {
                continue;
            }

            let sentence = SentenceId::new(fields[1].trim_matches(':'));

            match fields[0] {
                TEXT_DIRECTIVE => {
                    let words = fields[2..].iter().map(|w| w.to_string()).collect();
                    grammar.text.insert(sentence, words);
                }
                TRANSCRIPTION_DIRECTIVE => {
                    let slots = parse_slots(&fields[2..], number + 1, line)?;
                    grammar
                        .variants
                        .entry(sentence)
                        .or_default()
                        .extend(expand_slots(&slots));
                }
                _ => {}
            }
        }

        Ok(grammar)
    }

    /// Variants of a sentence, if it has any transcription line.
    pub fn variants(&self, sentence: &SentenceId) -> Option<&Variants> {
        self.variants.get(sentence)
    }

    /// Words of a sentence from its `TEXT` line.
    pub fn text(&self, sentence: &SentenceId) -> Option<&[String]> {
        self.text.get(sentence).map(Vec::as_slice)
    }

    /// Number of sentences with at least one transcription line.
    pub fn sentence_count(&self) -> usize {
        self.variants.len()
    }
}

/// Split each slot into its phone choices, rejecting empty choices.
fn parse_slots<'a>(fields: &[&'a str], line: usize, text: &str) -> Result<Vec<Vec<&'a str>>> {
    fields
        .iter()
        .map(|slot| {
            let choices: Vec<&str> = slot.split('/').map(str::trim).collect();

            if choices.iter().any(|c| c.is_empty()) {
                return Err(GrammarError::MalformedGrammarLine {
                    line,
                    slot: slot.to_string(),
                    text: text.trim().to_string(),
                }
                .into());
            }

            Ok(choices)
        })
        .collect()
}

/// Cartesian expansion of slots into full-length phone sequences.
///
/// For each slot, every accumulated sequence is copied once per choice, and
/// the copies are grouped by choice: `[A/B, C/D]` yields `AC, BC, AD, BD`.
pub fn expand_slots<S: AsRef<str>>(slots: &[Vec<S>]) -> Vec<Vec<String>> {
    slots.iter().fold(vec![Vec::new()], |acc, choices| {
        choices
            .iter()
            .flat_map(|phone| {
                acc.iter().map(move |prefix| {
                    let mut next = Vec::with_capacity(prefix.len() + 1);
                    next.extend(prefix.iter().cloned());
                    next.push(phone.as_ref().to_string());
                    next
                })
            })
            .collect()
    })
}

/// Remove every `0` placeholder, preserving order.
pub fn strip_deleted<S: AsRef<str>>(variant: &[S]) -> Vec<String> {
    variant
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|p| *p != DELETED)
        .map(str::to_string)
        .collect()
}

/// Collapse the allophonic alternatives of a grammar file's text.
///
/// Substitutions are applied in order over the whole text, so `AX/AH0`
/// becomes `AH0/AH0` after the `AX` rewrite.
pub fn prune_allophones(content: &str) -> String {
    ALLOPHONE_PRUNING
        .iter()
        .fold(content.to_string(), |text, (from, to)| text.replace(from, to))
}
