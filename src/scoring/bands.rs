/// One band of a threshold table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub threshold: f64,
    pub points: u32,
    pub label: &'static str,
}

const fn band(threshold: f64, points: u32, label: &'static str) -> Band {
    Band {
        threshold,
        points,
        label,
    }
}

/// How a metric is compared against a band's threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// metric >= threshold
    AtLeast,
    /// metric < threshold
    Below,
    /// metric <= threshold
    AtMost,
}

/// Ordered threshold table; the first matching band wins, otherwise `floor`
#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub comparison: Comparison,
    pub bands: &'static [Band],
    pub floor: Band,
}

impl BandTable {
    pub fn classify(&self, value: f64) -> Band {
        self.bands
            .iter()
            .find(|b| match self.comparison {
                Comparison::AtLeast => value >= b.threshold,
                Comparison::Below => value < b.threshold,
                Comparison::AtMost => value <= b.threshold,
            })
            .copied()
            .unwrap_or(self.floor)
    }

    pub fn max_points(&self) -> u32 {
        self.bands
            .iter()
            .map(|b| b.points)
            .chain(std::iter::once(self.floor.points))
            .max()
            .unwrap_or(0)
    }
}

/// Words per minute (lower bound inclusive, upper exclusive)
pub const SPEECH_RATE: BandTable = BandTable {
    comparison: Comparison::AtLeast,
    bands: &[
        band(161.0, 2, "Too fast"),
        band(141.0, 6, "Fast"),
        band(111.0, 10, "Ideal"),
        band(81.0, 6, "Slow"),
    ],
    floor: band(0.0, 0, "Too slow"),
};

/// Grammar error rate (errors per 100 words / 100)
pub const GRAMMAR: BandTable = BandTable {
    comparison: Comparison::Below,
    bands: &[
        band(0.3, 10, "Excellent"),
        band(0.5, 8, "Good"),
        band(0.7, 6, "Fair"),
        band(0.9, 4, "Weak"),
    ],
    floor: band(f64::INFINITY, 2, "Poor"),
};

/// Type-token ratio
pub const VOCABULARY: BandTable = BandTable {
    comparison: Comparison::AtLeast,
    bands: &[
        band(0.9, 10, "Excellent"),
        band(0.7, 8, "Good"),
        band(0.5, 6, "Fair"),
        band(0.3, 4, "Weak"),
    ],
    floor: band(0.0, 2, "Poor"),
};

/// Filler words as a percentage of all words
pub const FILLER: BandTable = BandTable {
    comparison: Comparison::AtMost,
    bands: &[
        band(3.0, 15, "Excellent"),
        band(6.0, 12, "Good"),
        band(9.0, 9, "Fair"),
        band(12.0, 6, "Weak"),
    ],
    floor: band(f64::INFINITY, 3, "Poor"),
};

/// Sentiment normalized into [0, 1]
pub const ENGAGEMENT: BandTable = BandTable {
    comparison: Comparison::AtLeast,
    bands: &[
        band(0.9, 15, "Excellent"),
        band(0.7, 12, "Good"),
        band(0.5, 9, "Fair"),
        band(0.3, 6, "Weak"),
    ],
    floor: band(0.0, 3, "Poor"),
};

/// Points per must-have keyword found, and their cap
pub const POINTS_PER_KEYWORD: u32 = 4;
pub const KEYWORD_POINTS_CAP: u32 = 20;

pub fn keyword_points(hits: usize) -> u32 {
    (hits as u32).saturating_mul(POINTS_PER_KEYWORD).min(KEYWORD_POINTS_CAP)
}

/// Words per minute. Without a usable duration the transcript is treated as
/// one minute of speech, so the word count itself is the rate.
pub fn words_per_minute(word_count: usize, duration_seconds: Option<f64>) -> f64 {
    match duration_seconds {
        Some(seconds) if seconds > 0.0 => word_count as f64 / (seconds / 60.0),
        _ => word_count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_rate_boundaries() {
        assert_eq!(SPEECH_RATE.classify(161.0).points, 2);
        assert_eq!(SPEECH_RATE.classify(160.999).label, "Fast");
        assert_eq!(SPEECH_RATE.classify(150.0).points, 6);
        assert_eq!(SPEECH_RATE.classify(141.0).points, 6);
        assert_eq!(SPEECH_RATE.classify(140.999).label, "Ideal");
        assert_eq!(SPEECH_RATE.classify(111.0).points, 10);
        assert_eq!(SPEECH_RATE.classify(110.5).label, "Slow");
        assert_eq!(SPEECH_RATE.classify(81.0).points, 6);
        assert_eq!(SPEECH_RATE.classify(80.9).label, "Too slow");
        assert_eq!(SPEECH_RATE.classify(0.0).points, 0);
    }

    #[test]
    fn test_grammar_bands() {
        assert_eq!(GRAMMAR.classify(0.0).points, 10);
        assert_eq!(GRAMMAR.classify(0.29).points, 10);
        assert_eq!(GRAMMAR.classify(0.3).points, 8);
        assert_eq!(GRAMMAR.classify(0.69).points, 6);
        assert_eq!(GRAMMAR.classify(0.89).points, 4);
        assert_eq!(GRAMMAR.classify(0.9).points, 2);
        assert_eq!(GRAMMAR.classify(5.0).points, 2);
    }

    #[test]
    fn test_vocabulary_bands() {
        assert_eq!(VOCABULARY.classify(1.0).points, 10);
        assert_eq!(VOCABULARY.classify(0.9).points, 10);
        assert_eq!(VOCABULARY.classify(0.75).points, 8);
        assert_eq!(VOCABULARY.classify(0.5).points, 6);
        assert_eq!(VOCABULARY.classify(0.3).points, 4);
        assert_eq!(VOCABULARY.classify(0.0).points, 2);
    }

    #[test]
    fn test_vocabulary_points_are_monotonic() {
        let mut previous = 0;
        for step in 0..=100 {
            let points = VOCABULARY.classify(step as f64 / 100.0).points;
            assert!(points >= previous);
            previous = points;
        }
    }

    #[test]
    fn test_filler_bands() {
        assert_eq!(FILLER.classify(0.0).points, 15);
        assert_eq!(FILLER.classify(3.0).points, 15);
        assert_eq!(FILLER.classify(3.01).points, 12);
        assert_eq!(FILLER.classify(9.0).points, 9);
        assert_eq!(FILLER.classify(12.0).points, 6);
        assert_eq!(FILLER.classify(12.5).points, 3);
    }

    #[test]
    fn test_engagement_bands() {
        assert_eq!(ENGAGEMENT.classify(0.95).points, 15);
        assert_eq!(ENGAGEMENT.classify(0.7).points, 12);
        assert_eq!(ENGAGEMENT.classify(0.5).points, 9);
        assert_eq!(ENGAGEMENT.classify(0.3).points, 6);
        assert_eq!(ENGAGEMENT.classify(0.1).points, 3);
    }

    #[test]
    fn test_table_maxima() {
        assert_eq!(SPEECH_RATE.max_points(), 10);
        assert_eq!(GRAMMAR.max_points() + VOCABULARY.max_points(), 20);
        assert_eq!(FILLER.max_points(), 15);
        assert_eq!(ENGAGEMENT.max_points(), 15);
    }

    #[test]
    fn test_keyword_points_cap() {
        assert_eq!(keyword_points(0), 0);
        assert_eq!(keyword_points(3), 12);
        assert_eq!(keyword_points(5), 20);
        assert_eq!(keyword_points(14), 20);
    }

    #[test]
    fn test_words_per_minute() {
        assert_eq!(words_per_minute(150, Some(60.0)), 150.0);
        assert_eq!(words_per_minute(100, Some(30.0)), 200.0);
        assert_eq!(words_per_minute(90, None), 90.0);
        assert_eq!(words_per_minute(90, Some(0.0)), 90.0);
    }
}
