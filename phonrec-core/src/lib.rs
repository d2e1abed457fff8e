//! phonrec-core: reconciliation of pronunciation grammars, forced alignments
//! and manual phone labels.
//!
//! For each recorded utterance three sequences are merged into one per-phone
//! record:
//!
//! - the canonical phones, chosen among the variants of the sentence's
//!   transcription grammar ([`grammar`], [`matcher`]),
//! - the phones the forced aligner observed ([`alignment`]),
//! - the manual correctness labels and times ([`reference`]).
//!
//! [`reconcile`] makes the three agree in length and [`writer`] persists the
//! result. [`pipeline`] ties the steps together for a list of utterances.
//!
//! # Quick Start
//!
//! ```ignore
//! use phonrec_core::alignment::PhoneAlignments;
//! use phonrec_core::grammar::Grammar;
//! use phonrec_core::pipeline::{LabelPipeline, OnError, read_utterance_list};
//!
//! let grammar = Grammar::from_file("reference_transcriptions.txt")?;
//! let alignments = PhoneAlignments::from_file("align_output")?;
//! let pipeline = LabelPipeline::new(grammar, alignments, "epadb".into());
//!
//! let utterances = read_utterance_list("test_sample_list.txt".as_ref())?;
//! pipeline.run(&utterances, "exp".as_ref(), OnError::Abort)?;
//! ```

pub mod alignment;
pub mod error;
pub mod grammar;
pub mod matcher;
pub mod pipeline;
pub mod reconcile;
pub mod reference;
pub mod types;
pub mod writer;
