//! End-to-end label generation over fixture files.

use phonrec_core::alignment::{PhoneAlignments, TimedAlignments};
use phonrec_core::error::{AlignmentError, Error, MatchError};
use phonrec_core::grammar::Grammar;
use phonrec_core::matcher::best_variant;
use phonrec_core::pipeline::{LabelPipeline, OnError, read_utterance_list};
use phonrec_core::types::{DELETED, SentenceId, UtteranceId};
use phonrec_core::writer::{label_path, read_labels};
use std::path::Path;

const GRAMMAR: &str = "\
TEXT 3: a street
TRANSCRIPTION 3: AX/AH0 S T R/0 IY T
TEXT 4: the cat
TRANSCRIPTION 4: DH AX K AE T
";

const ALIGNMENTS: &str = "\
spkr1_3 phones [('SIL', 0, 20), ('AH0_S', 20, 5), ('S_B', 25, 6), ('T_I', 31, 4), ('IY1_I', 35, 9), ('T_E', 44, 3), ('SIL', 47, 30)]
spkr1_3 words [('a', 20, 5), ('street', 25, 22)]
spkr2_4 phones [('SIL', 0, 8), ('DH_B', 8, 3), ('AH0_E', 11, 4), ('[key]', 15, 2), ('K_B', 17, 5), ('AE1_I', 22, 6), ('T_E', 28, 3)]
";

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn setup(root: &Path) -> LabelPipeline {
    write(&root.join("grammar.txt"), GRAMMAR);
    write(&root.join("align.txt"), ALIGNMENTS);
    write(
        &root.join("ref/spkr1/labels/spkr1_3.txt"),
        "1 AH0 AH0 1 0.20 0.25\n\
         2 S S 1 0.25 0.31\n\
         3 T T 1 0.31 0.35\n\
         4 R 0 0 0.35 0.35\n\
         5 IY IY 1 0.35 0.44\n\
         6 T T 1 0.44 0.47\n",
    );
    write(
        &root.join("ref/spkr2/labels/spkr2_4.txt"),
        "1 DH DH 1 0.08 0.11\n\
         2 AH0 AX 1 0.11 0.15\n\
         3 K K 1 0.17 0.22\n\
         4 AE EH 0 0.22 0.28\n\
         5 T T 1 0.28 0.31\n",
    );

    LabelPipeline::new(
        Grammar::from_file(root.join("grammar.txt")).unwrap(),
        PhoneAlignments::from_file(root.join("align.txt")).unwrap(),
        root.join("ref"),
    )
}

#[test]
fn writes_reconciled_label_files() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = setup(dir.path());
    let out = dir.path().join("out");

    write(&dir.path().join("list.txt"), "spkr1_3 extra\nspkr2_4\n");
    let utterances = read_utterance_list(&dir.path().join("list.txt")).unwrap();

    let summary = pipeline.run(&utterances, &out, OnError::Abort).unwrap();
    assert_eq!(summary.written.len(), 2);
    assert!(summary.failed.is_empty());

    let path = label_path(&out, &UtteranceId::new("spkr1_3")).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();

    assert_eq!(
        content,
        "spkr1_3_0 AH0 AH 1 0.20 0.25\n\
         spkr1_3_1 S S 1 0.25 0.31\n\
         spkr1_3_2 T T 1 0.31 0.35\n\
         spkr1_3_3 IY IY 1 0.35 0.44\n\
         spkr1_3_4 T T 1 0.44 0.47\n"
    );

    let rows = read_labels(&label_path(&out, &UtteranceId::new("spkr2_4")).unwrap()).unwrap();
    let observed: Vec<_> = rows.iter().map(|r| r.observed.as_str()).collect();
    assert_eq!(observed, ["DH", "AH", "K", "AE", "T"]);
    assert!(rows.iter().all(|r| r.canonical != DELETED));
}

#[test]
fn missing_alignment_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = setup(dir.path());
    let out = dir.path().join("out");

    let utterances = [UtteranceId::new("spkr3_3"), UtteranceId::new("spkr1_3")];
    let err = pipeline.run(&utterances, &out, OnError::Abort).unwrap_err();

    assert!(matches!(
        err,
        Error::Alignment(AlignmentError::MissingAlignment(ref id)) if id == "spkr3_3"
    ));
    assert!(!out.exists());
}

#[test]
fn unmatched_lengths_report_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    write(
        &dir.path().join("ref/spkr1/labels/spkr1_4.txt"),
        "1 DH DH 1 0 1\n",
    );
    let pipeline = LabelPipeline::new(
        Grammar::parse(GRAMMAR).unwrap(),
        PhoneAlignments::parse("spkr1_4 phones ('DH_B', 0, 3), ('K_E', 3, 4)\n"),
        dir.path().join("ref"),
    );

    let err = pipeline
        .write_utterance(&UtteranceId::new("spkr1_4"), &out)
        .unwrap_err();

    match err {
        Error::Match(MatchError::NoLengthMatchingVariant {
            sentence,
            candidates,
            ..
        }) => {
            assert_eq!(sentence, "4");
            assert_eq!(candidates, "[DH AX K AE T]");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn worked_examples_select_expected_variants() {
    let grammar = Grammar::parse("TRANSCRIPTION s1: AX/AH0 K\nTRANSCRIPTION s2: T 0/D\n").unwrap();

    let first = grammar.variants(&SentenceId::new("s1")).unwrap();
    assert_eq!(best_variant(first.clean(), &["AH0", "K"]), Some(1));

    let second = grammar.variants(&SentenceId::new("s2")).unwrap();
    assert_eq!(second.clean(), [vec!["T"], vec!["T", "D"]]);
    assert_eq!(best_variant(second.clean(), &["T"]), Some(0));
    assert_eq!(second.raw()[0], ["T", "0"]);
}

#[test]
fn timed_alignments_serialize_by_utterance() {
    let alignments = TimedAlignments::parse(ALIGNMENTS).unwrap();
    let json = serde_json::to_value(&alignments).unwrap();

    assert_eq!(json["spkr1_3"][1]["phone"], "AH");
    assert_eq!(json["spkr1_3"][1]["start"], 20);
    assert_eq!(json["spkr1_3"][1]["end"], 25);
    assert_eq!(json["spkr2_4"].as_array().unwrap().len(), 7);
}
