//! Tests for [`PromptCompressor`] end-to-end behaviour.

use skald::PromptCompressor;
use skald::cost::estimate_tokens;

#[test]
fn compression_reduces_token_count() {
    let compressor = PromptCompressor::default();
    let input = "\
The deployment guide describes how each service is started.
The deployment guide describes how each service is started.
It also covers   the   configuration   files in detail.
// reviewer note
The final section lists known issues and workarounds for each release.";

    let compressed = compressor.compress(input);
    assert!(estimate_tokens(&compressed) < estimate_tokens(input));
    assert!(compressed.contains("config"));
    assert!(!compressed.contains("reviewer note"));
}

#[test]
fn line_comments_are_stripped() {
    let compressor = PromptCompressor::default();
    let out = compressor.compress("keep this line keep this line keep\n// drop this\nkeep more text here too yes");
    assert!(!out.contains("drop this"));
    assert!(out.contains("keep more text here too yes"));
}

#[test]
fn block_comments_are_stripped_across_lines() {
    let compressor = PromptCompressor::new(0.0);
    let out = compressor.compress("before text\n/* one\ntwo\nthree */\nafter text");
    assert!(out.contains("before text"));
    assert!(out.contains("after text"));
    assert!(!out.contains("two"));
}

#[test]
fn urls_survive_compression() {
    let compressor = PromptCompressor::default();
    let out = compressor.compress("details at https://example.com/docs and some more surrounding prose");
    assert!(out.contains("https://example.com/docs"));
}

#[test]
fn markdown_headings_survive_compression() {
    let compressor = PromptCompressor::default();
    let input = "# Overview of this module and what it does\n\nSome prose body text explaining things.";
    let out = compressor.compress(input);
    assert!(out.contains("# Overview"));
}

#[test]
fn consecutive_duplicate_lines_collapse() {
    let compressor = PromptCompressor::new(0.0);
    let out = compressor.compress("alpha beta\nalpha beta\nalpha beta\ngamma delta");
    assert_eq!(out.matches("alpha beta").count(), 1);
    assert!(out.contains("gamma delta"));
}

#[test]
fn whitespace_variants_of_a_line_collapse_as_duplicates() {
    // Whitespace is normalised before duplicate detection, so lines that
    // differ only in spacing count as repeats.
    let compressor = PromptCompressor::new(0.0);
    let out = compressor.compress("alpha   beta\nalpha beta\nalpha  beta");
    assert_eq!(out, "alpha beta");
}

#[test]
fn safety_ratio_falls_back_to_original() {
    // Almost everything is a comment; compression would gut the prompt.
    let compressor = PromptCompressor::default();
    let input = "/* a very long comment that makes up nearly the entire text of this prompt */ ok";
    let out = compressor.compress(input);
    assert_eq!(out, input);
}

#[test]
fn min_ratio_zero_always_compresses() {
    let compressor = PromptCompressor::new(0.0);
    let input = "/* a very long comment that makes up nearly the entire text of this prompt */ ok";
    let out = compressor.compress(input);
    assert!(!out.contains("comment"));
    assert!(out.contains("ok"));
}

#[test]
fn empty_input_stays_empty() {
    let compressor = PromptCompressor::default();
    assert_eq!(compressor.compress(""), "");
}
