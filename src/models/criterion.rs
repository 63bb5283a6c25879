use serde::Serialize;

/// The five rubric criteria, in the order they are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Criterion {
    ContentStructure,
    SpeechRate,
    LanguageGrammar,
    Clarity,
    Engagement,
}

impl Criterion {
    /// Fixed reporting order
    pub const ALL: [Criterion; 5] = [
        Criterion::ContentStructure,
        Criterion::SpeechRate,
        Criterion::LanguageGrammar,
        Criterion::Clarity,
        Criterion::Engagement,
    ];

    /// Display name used in the payload and the export rows
    pub fn name(self) -> &'static str {
        match self {
            Criterion::ContentStructure => "Content & Structure",
            Criterion::SpeechRate => "Speech Rate",
            Criterion::LanguageGrammar => "Language & Grammar",
            Criterion::Clarity => "Clarity (Filler Rate)",
            Criterion::Engagement => "Engagement (Sentiment)",
        }
    }

    /// Maximum attainable points
    pub fn max_score(self) -> u32 {
        match self {
            Criterion::ContentStructure => 40,
            Criterion::SpeechRate => 10,
            Criterion::LanguageGrammar => 20,
            Criterion::Clarity => 15,
            Criterion::Engagement => 15,
        }
    }

    /// Sum of all criterion maxima (always 100)
    pub fn total_possible() -> u32 {
        Self::ALL.iter().map(|c| c.max_score()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_hundred() {
        assert_eq!(Criterion::total_possible(), 100);
    }

    #[test]
    fn test_reporting_order() {
        let names: Vec<&str> = Criterion::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "Content & Structure",
                "Speech Rate",
                "Language & Grammar",
                "Clarity (Filler Rate)",
                "Engagement (Sentiment)",
            ]
        );
    }
}
