//! Text normalisation: pure `&str → String` helpers.
//!
//! Wikipedia markup leaks three kinds of noise into extracted text:
//! citation brackets (`[1]`, `[citation needed]`), source-formatting
//! whitespace (newlines and indentation inside a `<p>`), and glued sentences
//! where two inline fragments were concatenated (`end.Next`). Each helper
//! below removes exactly one of them and nothing else.

use once_cell::sync::Lazy;
use regex::Regex;

// ── Bracket + whitespace cleaning ────────────────────────────────────────────

// `(?s)` lets a bracketed run span a newline; without it a second pass over
// the collapsed output could still find a pair, breaking idempotence.
static RE_BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove every bracketed run and collapse whitespace to single spaces.
///
/// Used for infobox values. Idempotent: brackets go first, then whitespace
/// (including the gaps the brackets leave) collapses, then the ends are
/// trimmed.
///
/// ```rust
/// use edgequake_wiki2md::pipeline::text::clean_text_value;
///
/// assert_eq!(clean_text_value("Multiple refs[1][2][3]"), "Multiple refs");
/// assert_eq!(clean_text_value("  Extra  spaces  "), "Extra spaces");
/// ```
pub fn clean_text_value(text: &str) -> String {
    let without_brackets = RE_BRACKETED.replace_all(text, "");
    collapse_whitespace(&without_brackets).trim().to_string()
}

// ── Reference markers ────────────────────────────────────────────────────────

static RE_TRAILING_REFS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\](?:\[\d+\])*$").unwrap());

/// Strip a trailing run of numeric reference markers (`[1][2][3]`).
///
/// Only list items go through this; paragraphs drop their `<sup>` nodes
/// before text extraction instead.
pub fn strip_reference_markers(text: &str) -> String {
    RE_TRAILING_REFS
        .replace(text.trim(), "")
        .trim()
        .to_string()
}

// ── Whitespace ───────────────────────────────────────────────────────────────

/// Any run of whitespace (newlines included) becomes exactly one space.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").into_owned()
}

// ── Sentence boundaries ──────────────────────────────────────────────────────

static RE_GLUED_SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])([A-Z])").unwrap());

/// Insert a space between sentence punctuation and a directly following
/// uppercase letter (`end.Next` → `end. Next`).
pub fn fix_sentence_boundaries(text: &str) -> String {
    RE_GLUED_SENTENCE.replace_all(text, "$1 $2").into_owned()
}
