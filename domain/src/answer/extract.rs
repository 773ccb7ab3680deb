//! Core answer extraction.
//!
//! Models are told to answer in a few words, but still emit markdown,
//! citation markers, HTML fragments and `<think>` reasoning blocks. Voting
//! only works on near-identical short strings, so every raw response goes
//! through [`extract_core`] before it becomes an answer.

use regex::Regex;
use std::sync::LazyLock;

/// Default maximum number of words kept from a response
pub const DEFAULT_MAX_ANSWER_WORDS: usize = 5;

static REASONING_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid reasoning regex"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_]{1,3}").expect("valid emphasis regex"));
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid citation regex"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static SEGMENT_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.\n!?]+").expect("valid segment regex"));

/// Remove reasoning blocks, markdown emphasis, numeric citations and
/// HTML-like tags, then collapse whitespace.
///
/// Reasoning blocks go first so their contents are dropped together with
/// the markers instead of surviving the generic tag pass.
pub fn clean(raw: &str) -> String {
    let text = REASONING_BLOCK.replace_all(raw, "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = CITATION.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract a short core answer phrase from a raw response.
///
/// Returns the first sentence-like segment longer than one character,
/// truncated to `max_words` words. Falls back to the first `max_words`
/// words of the cleaned text, and to `""` when nothing survives cleaning.
///
/// ```
/// use answer_quorum_domain::answer::extract_core;
///
/// let raw = "The answer is definitely **42**. [1] <think>reasoning...</think>";
/// assert_eq!(extract_core(raw, 5), "The answer is definitely 42");
/// ```
pub fn extract_core(raw: &str, max_words: usize) -> String {
    let text = clean(raw);
    if text.is_empty() {
        return String::new();
    }

    let segment = SEGMENT_BREAK
        .split(&text)
        .map(str::trim)
        .find(|s| s.chars().count() > 1);

    first_words(segment.unwrap_or(&text), max_words)
}

fn first_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Configured extractor, carrying the word limit applied to every response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerExtractor {
    max_words: usize,
}

impl AnswerExtractor {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn extract(&self, raw: &str) -> String {
        extract_core(raw, self.max_words)
    }
}

impl Default for AnswerExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ANSWER_WORDS)
    }
}
