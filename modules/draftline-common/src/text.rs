//! Text normalization shared by the opportunity scorer and the duplicate
//! detector.
//!
//! Two distinct stop-word lists exist on purpose: the general list feeds the
//! relevance filter, the overlap list feeds dedup fingerprints. The detector
//! tolerates fewer false positives than the scorer, so the lists are kept as
//! separate configurable sets and never merged.

use std::collections::HashSet;

/// Words too generic to use as relevance signals.
pub const GENERAL_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "has", "have", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "can", "shall", "not", "no", "non", "vs",
    "how", "what", "when", "where", "why", "who", "which", "that", "this", "it", "its", "if",
    "so", "up", "out", "all", "more", "some", "any", "new", "top", "best", "most", "only",
    "also", "just", "about",
];

/// Words ignored when computing topic overlap between a candidate and
/// published posts.
pub const OVERLAP_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "has", "have", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "can", "shall", "not", "no", "vs", "how",
    "what", "when", "where", "why", "who", "which", "that", "this", "it", "its", "if", "so",
    "up", "out", "all", "more", "some", "any", "new", "top", "best", "most", "only", "also",
    "just", "about", "your", "our", "their", "every", "each", "into",
];

pub const DEFAULT_MIN_WORD_LEN: usize = 3;

/// Extract the set of significant words from free text: lowercased, stripped
/// of everything outside `[a-z0-9\s-]`, split on whitespace and hyphens,
/// minus stop-words and tokens shorter than `min_len`. Pure and deterministic.
pub fn significant_words(text: &str, stopwords: &[&str], min_len: usize) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| w.len() >= min_len && !stopwords.contains(w))
        .map(str::to_string)
        .collect()
}

/// Number of whitespace-separated words in a body of text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// URL-safe slug: lowercase alphanumerics joined by single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = true;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
