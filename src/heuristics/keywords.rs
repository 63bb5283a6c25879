use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::metrics::tokenize;

/// Must-have content keywords for a self-introduction ("from" marks origin/location)
pub const MUST_HAVE_KEYWORDS: &[&str] = &[
    "name",
    "age",
    "school",
    "class",
    "family",
    "hobbies",
    "interests",
    "ambition",
    "goal",
    "dream",
    "fun fact",
    "strength",
    "achievement",
    "from",
];

/// Rubric phrasings collapsed onto a canonical keyword.
///
/// Replacement is plain substring replacement, so a variant embedded in a
/// longer entry is rewritten too.
pub const KEYWORD_SYNONYMS: &[(&str, &str)] = &[
    ("school/class", "school"),
    ("class/school", "school"),
    ("hobbies/interests", "hobbies"),
    ("what they do in free time", "hobbies"),
    ("ambition/goal/dream", "ambition"),
    ("strengths or achievements", "strength"),
];

/// Canonical keyword list, normalized once per process
pub static CANONICAL_KEYWORDS: Lazy<Vec<String>> =
    Lazy::new(|| normalize_keywords(MUST_HAVE_KEYWORDS));

/// Lowercase, trim and resolve synonyms; blank entries are dropped
pub fn normalize_keywords<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .filter_map(|entry| {
            let mut keyword = entry.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return None;
            }
            for (variant, canonical) in KEYWORD_SYNONYMS {
                if keyword.contains(variant) {
                    keyword = keyword.replace(variant, canonical);
                }
            }
            Some(keyword)
        })
        .collect()
}

/// Keywords present in `text`, in input order.
///
/// A keyword counts when it is an exact token or a substring of the
/// lowercased text (multi-word keywords only ever match the latter).
pub fn detect_keywords<'a>(text: &str, keywords: &'a [String]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    let tokens: HashSet<String> = tokenize(text).into_iter().collect();

    keywords
        .iter()
        .filter(|kw| {
            let kw = kw.to_lowercase();
            tokens.contains(&kw) || lower.contains(&kw)
        })
        .map(|kw| kw.as_str())
        .collect()
}
