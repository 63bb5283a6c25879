use tracing::{debug, info};

use crate::backends::{assess_grammar, assess_semantic, assess_sentiment, Backends};
use crate::heuristics::{apply_heuristics, CANONICAL_KEYWORDS};
use crate::metrics::{filler_rate, sentence_count, type_token_ratio, word_count};
use crate::models::{
    display_float, round_to, Components, Criterion, CriterionResult, RubricResult, Transcript,
};

use super::bands::{
    keyword_points, words_per_minute, ENGAGEMENT, FILLER, GRAMMAR, SPEECH_RATE, VOCABULARY,
};

/// Scores introduction transcripts against the fixed rubric.
///
/// Holds the keyword list and the lazily connected backends; safe to share
/// between concurrent callers.
pub struct RubricEngine {
    backends: Backends,
    keywords: Vec<String>,
}

impl RubricEngine {
    pub fn new(backends: Backends) -> Self {
        Self {
            backends,
            keywords: CANONICAL_KEYWORDS.clone(),
        }
    }

    /// Engine that only uses the heuristic fallbacks
    pub fn offline() -> Self {
        Self::new(Backends::disabled())
    }

    /// Score a transcript
    ///
    /// The five criteria are independent; the three that consult a backend
    /// run concurrently. Never fails: backend problems degrade to fallbacks.
    pub async fn score(&self, transcript: &Transcript) -> RubricResult {
        let text = transcript.text();
        let words = word_count(text);
        let sentences = sentence_count(text);

        info!(
            "Scoring transcript: {} words, {} sentences, duration {:?}",
            words,
            sentences,
            transcript.duration_seconds()
        );

        let (content, language, engagement) = tokio::join!(
            self.content_structure(text),
            self.language_grammar(text),
            self.engagement(text),
        );
        let speech = speech_rate(words, transcript.duration_seconds());
        let clarity = clarity(text);

        let result = RubricResult::from_criteria(
            words,
            sentences,
            transcript.duration_seconds(),
            vec![content, speech, language, clarity, engagement],
        );

        info!(
            "Overall score {} ({} / {})",
            result.overall_score, result.totals.attained, result.totals.possible
        );
        result
    }

    async fn content_structure(&self, text: &str) -> CriterionResult {
        let findings = apply_heuristics(text, &self.keywords);
        let hits = findings.keyword_hits();
        let keyword_score = keyword_points(hits);

        let model = self.backends.semantic().await;
        let semantic = assess_semantic(text, hits, self.keywords.len(), model).await;

        debug!(
            "Content: salutation={} keywords={} flow={} semantic={:.3}",
            findings.salutation.points, keyword_score, findings.flow.points, semantic.bonus
        );

        let total = (findings.salutation.points + keyword_score + findings.flow.points) as f64
            + semantic.bonus;

        let keywords_found = if findings.keywords_found.is_empty() {
            "None".to_string()
        } else {
            findings.keywords_found.join(", ")
        };
        let feedback = format!(
            "{}  Keywords found: {}.  {}.  {}",
            findings.salutation.message, keywords_found, findings.flow.message, semantic.note
        );

        let components = Components::new()
            .number("Salutation (5)", findings.salutation.points as f64)
            .number("Keywords (20)", keyword_score as f64)
            .number("Flow (5)", findings.flow.points as f64)
            .number("Semantic bonus (0-10)", round_to(semantic.bonus, 3));

        CriterionResult::new(
            Criterion::ContentStructure,
            components,
            round_to(total, 3),
            feedback,
        )
    }

    async fn language_grammar(&self, text: &str) -> CriterionResult {
        let checker = self.backends.grammar().await;
        let grammar = assess_grammar(text, checker).await;
        let grammar_points = GRAMMAR.classify(grammar.errors_per_100_words / 100.0).points;

        let ttr = type_token_ratio(text);
        let ttr_points = VOCABULARY.classify(ttr).points;

        debug!(
            "Language: errors_per_100={:.3} ({} pts) ttr={:.3} ({} pts)",
            grammar.errors_per_100_words, grammar_points, ttr, ttr_points
        );

        let components = Components::new()
            .number(
                "Grammar errors per100",
                round_to(grammar.errors_per_100_words, 3),
            )
            .number("Grammar points (out of 10)", grammar_points as f64)
            .number("TTR", round_to(ttr, 3))
            .number("TTR points (out of 10)", ttr_points as f64);

        CriterionResult::new(
            Criterion::LanguageGrammar,
            components,
            (grammar_points + ttr_points) as f64,
            format!("{}. TTR={}", grammar.note, display_float(round_to(ttr, 3))),
        )
    }

    async fn engagement(&self, text: &str) -> CriterionResult {
        let analyzer = self.backends.sentiment().await;
        let sentiment = assess_sentiment(text, analyzer);
        let points = ENGAGEMENT.classify(sentiment.normalized).points;

        debug!(
            "Engagement: sentiment={:.3} ({} pts)",
            sentiment.normalized, points
        );

        let components =
            Components::new().number("Sentiment_normalized_0_1", round_to(sentiment.normalized, 3));

        CriterionResult::new(
            Criterion::Engagement,
            components,
            points as f64,
            sentiment.note,
        )
    }
}

/// Speech rate criterion
fn speech_rate(words: usize, duration_seconds: Option<f64>) -> CriterionResult {
    let wpm = words_per_minute(words, duration_seconds);
    let band = SPEECH_RATE.classify(wpm);
    let wpm_display = round_to(wpm, 2);

    debug!("Speech rate: {:.2} wpm ({})", wpm, band.label);

    let components = Components::new()
        .number("WPM", wpm_display)
        .label("band_message", band.label);

    CriterionResult::new(
        Criterion::SpeechRate,
        components,
        band.points as f64,
        format!("WPM={}. {}", display_float(wpm_display), band.label),
    )
}

/// Clarity criterion from the filler-word rate
fn clarity(text: &str) -> CriterionResult {
    let filler = filler_rate(text);
    let points = FILLER.classify(filler.percent).points;

    debug!(
        "Clarity: {} fillers ({:.2}%, {} pts)",
        filler.count, filler.percent, points
    );

    let components = Components::new()
        .number("Filler %", round_to(filler.percent, 3))
        .number("Filler count", filler.count as f64);

    CriterionResult::new(
        Criterion::Clarity,
        components,
        points as f64,
        format!(
            "Filler words={}, filler_percent={}%",
            filler.count,
            display_float(round_to(filler.percent, 2))
        ),
    )
}

/// Score `text` spoken over `duration_seconds` with `engine`
pub async fn score_transcript(
    engine: &RubricEngine,
    text: &str,
    duration_seconds: Option<f64>,
) -> RubricResult {
    engine.score(&Transcript::new(text, duration_seconds)).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::backends::{EmbeddingModel, GrammarChecker, GrammarMatch, SentimentAnalyzer};
    use crate::error::BackendResult;

    const SAMPLE: &str = "Hello everyone, my name is Sam. I am 12 years old and I study in class 7. \
                          My hobby is football. Thank you.";

    struct OneError;

    #[async_trait]
    impl GrammarChecker for OneError {
        async fn check(&self, _text: &str) -> BackendResult<Vec<GrammarMatch>> {
            Ok(vec![
                GrammarMatch {
                    rule_id: "UPPERCASE_SENTENCE_START".to_string(),
                    message: "Capitalize".to_string(),
                },
                GrammarMatch {
                    rule_id: "WHITESPACE_RULE".to_string(),
                    message: "Whitespace".to_string(),
                },
            ])
        }
    }

    struct Cheerful;

    impl SentimentAnalyzer for Cheerful {
        fn compound(&self, _text: &str) -> BackendResult<f64> {
            Ok(0.9)
        }
    }

    struct Identical;

    #[async_trait]
    impl EmbeddingModel for Identical {
        async fn embed(&self, inputs: &[&str]) -> BackendResult<Vec<Vec<f32>>> {
            Ok(inputs.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn engine_with_fakes() -> RubricEngine {
        RubricEngine::new(
            Backends::disabled()
                .with_grammar(Arc::new(OneError))
                .with_sentiment(Arc::new(Cheerful))
                .with_semantic(Arc::new(Identical)),
        )
    }

    fn component(result: &RubricResult, criterion: Criterion, label: &str) -> f64 {
        result
            .criterion(criterion)
            .and_then(|c| c.components.get(label))
            .and_then(|v| v.as_number())
            .unwrap()
    }

    fn assert_bounds(result: &RubricResult) {
        assert!((0.0..=100.0).contains(&result.overall_score));
        assert_eq!(result.totals.possible, 100);
        assert_eq!(result.per_criterion.len(), 5);
        for c in &result.per_criterion {
            assert!(c.score >= 0.0 && c.score <= c.max_score as f64, "{:?}", c);
            assert!(!c.feedback.is_empty());
        }
    }

    #[tokio::test]
    async fn test_offline_sample_scores() {
        let engine = RubricEngine::offline();
        let result = score_transcript(&engine, SAMPLE, None).await;

        assert_eq!(result.word_count, 23);
        assert_eq!(result.sentence_count, 4);
        assert_eq!(result.duration_seconds_used, None);

        let content = result.criterion(Criterion::ContentStructure).unwrap();
        assert!((content.score - 16.429).abs() < 1e-9);
        assert_eq!(
            content.feedback,
            "Found greeting 'hello'.  Keywords found: name, class.  Flow followed.  \
             Semantic model not available or not used."
        );

        let speech = result.criterion(Criterion::SpeechRate).unwrap();
        assert_eq!(speech.score, 0.0);
        assert_eq!(speech.feedback, "WPM=23.0. Too slow");

        let language = result.criterion(Criterion::LanguageGrammar).unwrap();
        assert_eq!(language.score, 18.0);
        assert_eq!(
            language.feedback,
            "0 heuristic grammar issues (fallback). TTR=0.87"
        );

        let clarity = result.criterion(Criterion::Clarity).unwrap();
        assert_eq!(clarity.score, 15.0);
        assert_eq!(clarity.feedback, "Filler words=0, filler_percent=0.0%");

        let engagement = result.criterion(Criterion::Engagement).unwrap();
        assert_eq!(engagement.score, 9.0);
        assert_eq!(engagement.feedback, "VADER not available; using neutral fallback");

        assert_eq!(result.overall_score, 58.43);
        assert_bounds(&result);
    }

    #[tokio::test]
    async fn test_primary_backends() {
        let engine = engine_with_fakes();
        let result = score_transcript(&engine, SAMPLE, Some(12.0)).await;

        // 23 words over 12 seconds
        assert_eq!(component(&result, Criterion::SpeechRate, "WPM"), 115.0);
        assert_eq!(result.criterion(Criterion::SpeechRate).unwrap().score, 10.0);

        // one counted match in 23 words: 4.348 per 100, rate 0.043
        let language = result.criterion(Criterion::LanguageGrammar).unwrap();
        assert_eq!(component(&result, Criterion::LanguageGrammar, "Grammar errors per100"), 4.348);
        assert!(language.feedback.starts_with("1 grammar issues detected by language-tool"));

        assert_eq!(component(&result, Criterion::ContentStructure, "Semantic bonus (0-10)"), 10.0);
        let content = result.criterion(Criterion::ContentStructure).unwrap();
        assert!(content.feedback.ends_with("Semantic similarity normalized=1.0"));
        assert!((content.score - 25.0).abs() < 1e-9);

        let engagement = result.criterion(Criterion::Engagement).unwrap();
        assert_eq!(engagement.score, 15.0);
        assert_eq!(engagement.feedback, "VADER compound raw=0.9");

        assert_eq!(result.duration_seconds_used, Some(12.0));
        assert_bounds(&result);
    }

    #[tokio::test]
    async fn test_whitespace_only_transcript() {
        let engine = RubricEngine::offline();
        let result = score_transcript(&engine, " ", None).await;

        assert_eq!(result.word_count, 0);
        assert_eq!(result.sentence_count, 0);
        assert_eq!(component(&result, Criterion::SpeechRate, "WPM"), 0.0);
        assert_eq!(component(&result, Criterion::LanguageGrammar, "TTR"), 0.0);
        assert_eq!(component(&result, Criterion::Clarity, "Filler %"), 0.0);
        assert!(result
            .criterion(Criterion::LanguageGrammar)
            .unwrap()
            .feedback
            .starts_with("No words."));
        // flow 5 + grammar 10 + ttr 2 + clarity 15 + neutral engagement 9
        assert_eq!(result.totals.attained, 41.0);
        assert_eq!(result.overall_score, 41.0);
        assert_bounds(&result);
    }

    #[tokio::test]
    async fn test_salutation_priority() {
        let engine = RubricEngine::offline();
        let result = score_transcript(
            &engine,
            "Good morning! I am excited to introduce myself to all of you.",
            None,
        )
        .await;
        assert_eq!(component(&result, Criterion::ContentStructure, "Salutation (5)"), 5.0);
    }

    #[tokio::test]
    async fn test_out_of_order_flow() {
        let engine = RubricEngine::offline();
        let result = score_transcript(&engine, "Thank you. Hi, my name is Sam.", None).await;
        assert_eq!(component(&result, Criterion::ContentStructure, "Flow (5)"), 0.0);
    }

    #[tokio::test]
    async fn test_speech_rate_at_band_edge() {
        let engine = RubricEngine::offline();
        let text = "word ".repeat(150);
        let result = score_transcript(&engine, &text, Some(60.0)).await;

        let speech = result.criterion(Criterion::SpeechRate).unwrap();
        assert_eq!(speech.score, 6.0);
        assert_eq!(speech.feedback, "WPM=150.0. Fast");
    }

    #[tokio::test]
    async fn test_half_way_values_round_to_even() {
        let engine = RubricEngine::offline();

        let text = format!("um {}", "word ".repeat(31));
        let result = score_transcript(&engine, &text, None).await;
        let clarity = result.criterion(Criterion::Clarity).unwrap();
        assert_eq!(clarity.feedback, "Filler words=1, filler_percent=3.12%");
        assert_eq!(clarity.score, 12.0);

        let text = "word ".repeat(801);
        let result = score_transcript(&engine, &text, Some(480.0)).await;
        let speech = result.criterion(Criterion::SpeechRate).unwrap();
        assert_eq!(speech.feedback, "WPM=100.12. Slow");
        assert_eq!(component(&result, Criterion::SpeechRate, "WPM"), 100.12);
    }

    #[tokio::test]
    async fn test_keyword_points_are_capped() {
        let engine = RubricEngine::offline();
        let text = "Hello, my name is Tara, my age is 13, I am from Pune. My school is great and \
                    my class is 8. My family is small. My hobbies and interests are music. \
                    My ambition, goal and dream is to teach. A fun fact about me: my strength \
                    is patience and my achievement is a medal. Thank you.";
        let result = score_transcript(&engine, text, None).await;

        assert_eq!(component(&result, Criterion::ContentStructure, "Keywords (20)"), 20.0);
        assert_eq!(
            component(&result, Criterion::ContentStructure, "Semantic bonus (0-10)"),
            10.0
        );
        assert_bounds(&result);
    }

    #[tokio::test]
    async fn test_scoring_is_idempotent() {
        let engine = engine_with_fakes();
        let text = "Um, hi, I am Ravi, like, I like cricket, you know. Thank you so much.";
        let first = score_transcript(&engine, text, Some(20.0)).await;
        let second = score_transcript(&engine, text, Some(20.0)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_bounds_hold_for_varied_inputs() {
        let engine = RubricEngine::offline();
        let texts = [
            "",
            "!!!",
            "um um um um uh uh like like so so",
            "the the the the the the",
            "I dont know. It isnt fair. I cant go.",
            SAMPLE,
        ];
        for text in texts {
            for duration in [None, Some(1.0), Some(600.0)] {
                assert_bounds(&score_transcript(&engine, text, duration).await);
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_scoring_shares_engine() {
        let engine = Arc::new(engine_with_fakes());
        let expected = score_transcript(&engine, SAMPLE, Some(30.0)).await;

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { score_transcript(&engine, SAMPLE, Some(30.0)).await })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), expected);
        }
    }
}
