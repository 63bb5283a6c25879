use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());
static SENTENCE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Split text into lowercase word tokens; anything that is not a word
/// character separates tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Number of word tokens
pub fn word_count(text: &str) -> usize {
    tokenize(text).len()
}

/// Number of distinct word tokens
pub fn unique_word_count(text: &str) -> usize {
    tokenize(text).into_iter().collect::<HashSet<_>>().len()
}

/// Unique tokens over total tokens, 0.0 for empty input
pub fn type_token_ratio(text: &str) -> f64 {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&String> = tokens.iter().collect();
    unique.len() as f64 / tokens.len() as f64
}

/// Count non-empty segments between runs of `.`, `!` and `?`
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_BREAK_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
}
