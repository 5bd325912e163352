//! Retrieval behavior against real on-disk corpora.

use std::fs;
use tempfile::TempDir;

use ceres_context::corpus::DirectoryCorpus;
use ceres_context::error::CorpusError;
use ceres_context::retrieve::{rank_paragraphs, retrieve_context, CONTEXT_SEPARATOR};

fn txt_globs() -> Vec<String> {
    vec!["*.txt".to_string()]
}

fn corpus_from(tmp: &TempDir) -> DirectoryCorpus {
    DirectoryCorpus::new(tmp.path(), &txt_globs()).unwrap()
}

#[test]
fn coffee_rust_scenario_returns_single_paragraph() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("guide.txt"),
        "Coffee leaf rust thrives in humid weather.\n\nPepper vines need regular pruning.",
    )
    .unwrap();

    let corpus = corpus_from(&tmp);
    let context = retrieve_context(&corpus, "coffee rust", 3).unwrap();

    assert_eq!(context, "Coffee leaf rust thrives in humid weather.");
    assert!(!context.contains(CONTEXT_SEPARATOR));
}

#[test]
fn empty_query_yields_empty_context() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("guide.txt"),
        "Coffee leaf rust thrives in humid weather.",
    )
    .unwrap();

    let corpus = corpus_from(&tmp);
    assert_eq!(retrieve_context(&corpus, "", 3).unwrap(), "");
    assert_eq!(retrieve_context(&corpus, "...!?", 3).unwrap(), "");
}

#[test]
fn results_join_with_separator_in_score_order() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("a.txt"),
        "Coffee plants prefer well-drained soil.\n\n\
         Coffee leaf rust spreads quickly in humid weather.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("b.txt"),
        "Humid conditions favor fungal outbreaks in plantations.",
    )
    .unwrap();

    let corpus = corpus_from(&tmp);
    let context = retrieve_context(&corpus, "coffee rust humid", 3).unwrap();
    let parts: Vec<&str> = context.split(CONTEXT_SEPARATOR).collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "Coffee leaf rust spreads quickly in humid weather.");
}

#[test]
fn unreadable_document_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    // Invalid UTF-8: read_to_string fails for this document.
    fs::write(tmp.path().join("broken.txt"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();
    fs::write(
        tmp.path().join("guide.txt"),
        "Coffee leaf rust thrives in humid weather.",
    )
    .unwrap();

    let corpus = corpus_from(&tmp);
    let context = retrieve_context(&corpus, "coffee rust", 3).unwrap();
    assert_eq!(context, "Coffee leaf rust thrives in humid weather.");
}

#[test]
fn non_txt_files_are_invisible_to_retrieval() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("guide.md"),
        "Coffee leaf rust thrives in humid weather.",
    )
    .unwrap();

    let corpus = corpus_from(&tmp);
    assert_eq!(retrieve_context(&corpus, "coffee rust", 3).unwrap(), "");
}

#[test]
fn missing_corpus_directory_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let corpus = DirectoryCorpus::new(tmp.path().join("absent"), &txt_globs()).unwrap();

    let err = retrieve_context(&corpus, "coffee", 3).unwrap_err();
    assert!(matches!(err, CorpusError::Access { .. }));

    // The empty-query short-circuit never touches the directory.
    assert_eq!(retrieve_context(&corpus, "", 3).unwrap(), "");
}

#[test]
fn retrieval_is_idempotent_byte_for_byte() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("a.txt"),
        "Coffee leaf rust thrives in humid weather.\n\n\
         Shade trees lower humidity inside the plantation.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("b.txt"),
        "Bordeaux mixture controls coffee leaf rust outbreaks.",
    )
    .unwrap();

    let first = retrieve_context(&corpus_from(&tmp), "coffee rust humidity", 3).unwrap();
    let second = retrieve_context(&corpus_from(&tmp), "coffee rust humidity", 3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn tied_scores_are_ordered_the_same_on_every_call() {
    let tmp = TempDir::new().unwrap();
    // Same score for every paragraph; order must still be stable.
    fs::write(
        tmp.path().join("a.txt"),
        "mango trees need deep watering in summer.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("b.txt"),
        "apple trees need deep watering in summer.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("c.txt"),
        "lemon trees need deep watering in summer.",
    )
    .unwrap();

    let ranked = rank_paragraphs(&corpus_from(&tmp), "watering").unwrap();
    let texts: Vec<&str> = ranked.iter().map(|p| p.text.as_str()).collect();

    // Lexicographically descending on the paragraph text.
    assert_eq!(
        texts,
        vec![
            "mango trees need deep watering in summer.",
            "lemon trees need deep watering in summer.",
            "apple trees need deep watering in summer.",
        ]
    );

    for _ in 0..3 {
        let again = rank_paragraphs(&corpus_from(&tmp), "watering").unwrap();
        let again_texts: Vec<&str> = again.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, again_texts);
    }
}

#[test]
fn top_k_one_returns_only_the_best() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("guide.txt"),
        "Coffee rust humid weather paragraph, highest score.\n\n\
         Coffee rust paragraph with a middling score.\n\n\
         Coffee alone appears in this final paragraph.",
    )
    .unwrap();

    let context = retrieve_context(&corpus_from(&tmp), "coffee rust humid", 1).unwrap();
    assert_eq!(context, "Coffee rust humid weather paragraph, highest score.");
}

#[test]
fn duplicate_paragraphs_across_files_collapse() {
    let tmp = TempDir::new().unwrap();
    let para = "Coffee leaf rust thrives in humid weather.";
    fs::write(tmp.path().join("a.txt"), para).unwrap();
    fs::write(tmp.path().join("b.txt"), para).unwrap();

    let ranked = rank_paragraphs(&corpus_from(&tmp), "coffee rust").unwrap();
    assert_eq!(ranked.len(), 1);
}
