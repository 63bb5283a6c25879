use once_cell::sync::Lazy;
use regex::Regex;

use super::text::word_count;

/// Words and phrases counted against clarity
pub const FILLER_WORDS: &[&str] = &[
    "um", "uh", "like", "you know", "so", "actually", "basically", "right", "i mean", "well",
    "kind of", "sort of", "okay", "hmm", "erm", "ah", "uhm", "ahh",
];

static FILLER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    FILLER_WORDS
        .iter()
        .map(|f| Regex::new(&format!(r"\b{}\b", regex::escape(f))).unwrap())
        .collect()
});

/// Filler occurrences relative to the transcript length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillerRate {
    /// 100 * occurrences / words
    pub percent: f64,
    pub count: usize,
}

/// Count whole-word filler matches (multi-word entries included)
pub fn filler_rate(text: &str) -> FillerRate {
    let words = word_count(text);
    if words == 0 {
        return FillerRate {
            percent: 0.0,
            count: 0,
        };
    }

    let lower = text.to_lowercase();
    let count: usize = FILLER_PATTERNS
        .iter()
        .map(|re| re.find_iter(&lower).count())
        .sum();

    FillerRate {
        percent: count as f64 / words as f64 * 100.0,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filler_rate_counts_phrases() {
        // 10 words: "um", "you know" and "like" are fillers
        let rate = filler_rate("Um I really like it you know and it works");
        assert_eq!(rate.count, 3);
        assert!((rate.percent - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_filler_requires_word_boundary() {
        // "summer" and "likely" must not match "um" or "like"
        let rate = filler_rate("Summer is likely warm");
        assert_eq!(rate.count, 0);
    }

    #[test]
    fn test_filler_rate_empty() {
        let rate = filler_rate("   ");
        assert_eq!(rate.count, 0);
        assert_eq!(rate.percent, 0.0);
    }
}
