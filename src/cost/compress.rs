//! Prompt compression.
//!
//! A pipeline of lossy transformations that shrink a prompt before token
//! estimation and the provider call: whitespace collapsing, comment
//! stripping, consecutive-duplicate-line collapsing, and abbreviation
//! substitution, applied in that order.
//!
//! Compression is guarded by a safety ratio: if the result drops below
//! `min_ratio` of the original length, too much content was removed to
//! trust the output quality, and the original text is used unmodified.

use tracing::debug;

/// Phrases replaced by shorter equivalents. Longest-first so prefixes
/// don't shadow longer matches.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("for example", "e.g."),
    ("in other words", "i.e."),
    ("documentation", "docs"),
    ("implementation", "impl"),
    ("configuration", "config"),
    ("information", "info"),
    ("repository", "repo"),
    ("application", "app"),
];

/// Prompt compressor with a minimum-retention safety valve.
#[derive(Debug, Clone)]
pub struct PromptCompressor {
    /// Minimum fraction of the original length the compressed text must
    /// retain. Default: 0.5.
    pub min_ratio: f64,
}

impl Default for PromptCompressor {
    fn default() -> Self {
        Self { min_ratio: 0.5 }
    }
}

impl PromptCompressor {
    pub fn new(min_ratio: f64) -> Self {
        Self { min_ratio }
    }

    /// Compress a text, or return it unchanged when compression would
    /// remove too much.
    pub fn compress(&self, text: &str) -> String {
        let mut out = collapse_whitespace(text);
        out = strip_comments(&out);
        out = collapse_duplicate_lines(&out);
        out = substitute_abbreviations(&out);

        let ratio = if text.is_empty() {
            1.0
        } else {
            out.len() as f64 / text.len() as f64
        };
        if ratio < self.min_ratio {
            debug!(
                original = text.len(),
                compressed = out.len(),
                min_ratio = self.min_ratio,
                "compression discarded too much, using original text"
            );
            return text.to_string();
        }
        out
    }
}

/// Collapse runs of spaces/tabs to one space and runs of blank lines to a
/// single blank line, trimming trailing whitespace per line.
fn collapse_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut last_blank = false;
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !last_blank && !lines.is_empty() {
                lines.push(String::new());
            }
            last_blank = true;
        } else {
            lines.push(collapsed);
            last_blank = false;
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

/// Drop line comments (`//`) and block comments (`/* .. */`).
///
/// `#` is left alone: input material is frequently markdown, where `#`
/// starts a heading. String literals containing comment markers are not
/// distinguished; this is lossy compression of prompt material, not
/// parsing.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_block = false;
    for line in text.lines() {
        let mut rest = line;
        let mut kept = String::new();
        loop {
            if in_block {
                match rest.find("*/") {
                    Some(end) => {
                        in_block = false;
                        rest = &rest[end + 2..];
                    }
                    None => {
                        rest = "";
                        break;
                    }
                }
            } else {
                let block = rest.find("/*");
                let line_c = find_line_comment(rest);
                match (block, line_c) {
                    (Some(b), Some(l)) if l < b => {
                        kept.push_str(&rest[..l]);
                        rest = "";
                        break;
                    }
                    (Some(b), _) => {
                        kept.push_str(&rest[..b]);
                        in_block = true;
                        rest = &rest[b + 2..];
                    }
                    (None, Some(l)) => {
                        kept.push_str(&rest[..l]);
                        rest = "";
                        break;
                    }
                    (None, None) => {
                        kept.push_str(rest);
                        rest = "";
                        break;
                    }
                }
            }
        }
        debug_assert!(rest.is_empty());
        if !kept.trim().is_empty() || line.trim().is_empty() {
            out.push_str(kept.trim_end());
            out.push('\n');
        }
    }
    out
}

/// Find a `//` line comment start, skipping occurrences embedded in
/// longer tokens such as `https://` URLs.
fn find_line_comment(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut from = 0;
    while let Some(pos) = s[from..].find("//").map(|p| p + from) {
        if pos == 0 || bytes[pos - 1].is_ascii_whitespace() {
            return Some(pos);
        }
        from = pos + 2;
    }
    None
}

/// Collapse consecutive identical non-empty lines to one occurrence.
fn collapse_duplicate_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        if !line.trim().is_empty() && out.last() == Some(&line) {
            continue;
        }
        out.push(line);
    }
    out.join("\n")
}

/// Replace verbose phrases with common abbreviations (case-sensitive,
/// lowercase only — prose headings keep their casing).
fn substitute_abbreviations(text: &str) -> String {
    let mut out = text.to_string();
    for (long, short) in ABBREVIATIONS {
        out = out.replace(long, short);
    }
    out
}
