use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Availability, BackendConfig};
use crate::error::{BackendError, BackendResult};
use crate::metrics::word_count;

pub const GRAMMAR_BACKEND: &str = "language-tool";

/// Rule id that only flags whitespace; never counted as an error
pub const WHITESPACE_RULE: &str = "WHITESPACE_RULE";

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());
static MISSING_APOSTROPHE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(dont|doesnt|isnt|cant|wont|shouldnt|couldnt|wouldnt)\b").unwrap()
});

/// A single rule violation reported by a grammar checker
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarMatch {
    pub rule_id: String,
    pub message: String,
}

/// A rule-based grammar checker
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    async fn check(&self, text: &str) -> BackendResult<Vec<GrammarMatch>>;
}

/// Error density of a transcript and how it was measured
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarAssessment {
    pub errors_per_100_words: f64,
    pub error_count: usize,
    pub note: String,
    pub used_fallback: bool,
}

/// Measure grammar errors per 100 words, falling back to the pattern
/// heuristic when the checker is unavailable or fails
pub async fn assess_grammar(
    text: &str,
    checker: &Availability<dyn GrammarChecker>,
) -> GrammarAssessment {
    let words = word_count(text);
    if words == 0 {
        return GrammarAssessment {
            errors_per_100_words: 0.0,
            error_count: 0,
            note: "No words".to_string(),
            used_fallback: !checker.is_available(),
        };
    }

    let failure = match checker {
        Availability::Available(checker) => match checker.check(text).await {
            Ok(matches) => {
                let errors = count_rule_violations(&matches);
                debug!("{} grammar matches, {} counted", matches.len(), errors);
                return GrammarAssessment {
                    errors_per_100_words: per_100(errors, words),
                    error_count: errors,
                    note: format!("{} grammar issues detected by language-tool", errors),
                    used_fallback: false,
                };
            }
            Err(e) => {
                warn!("Grammar check failed, using heuristic: {}", e);
                Some(e)
            }
        },
        Availability::Unavailable(_) => None,
    };

    let errors = heuristic_error_count(text);
    let note = match failure {
        Some(e) => format!(
            "language-tool check failed: {}; {} heuristic grammar issues (fallback)",
            e, errors
        ),
        None => format!("{} heuristic grammar issues (fallback)", errors),
    };

    GrammarAssessment {
        errors_per_100_words: per_100(errors, words),
        error_count: errors,
        note,
        used_fallback: true,
    }
}

/// Count matches, ignoring the whitespace-only rule
pub fn count_rule_violations(matches: &[GrammarMatch]) -> usize {
    matches
        .iter()
        .filter(|m| !m.rule_id.is_empty() && m.rule_id != WHITESPACE_RULE)
        .count()
}

/// Lightweight error count: immediately repeated words ("the the") plus
/// contractions written without an apostrophe ("dont")
pub fn heuristic_error_count(text: &str) -> usize {
    let lower = text.to_lowercase();
    repeated_word_pairs(&lower) + MISSING_APOSTROPHE_RE.find_iter(&lower).count()
}

/// Non-overlapping pairs of identical words separated only by whitespace
fn repeated_word_pairs(lower: &str) -> usize {
    let words: Vec<regex::Match> = WORD_RE.find_iter(lower).collect();
    let mut pairs = 0;
    let mut i = 0;

    while i + 1 < words.len() {
        let (first, second) = (words[i], words[i + 1]);
        let gap = &lower[first.end()..second.start()];
        let whitespace_gap = !gap.is_empty() && gap.chars().all(char::is_whitespace);

        if whitespace_gap && first.as_str() == second.as_str() {
            pairs += 1;
            i += 2;
        } else {
            i += 1;
        }
    }

    pairs
}

fn per_100(errors: usize, words: usize) -> f64 {
    errors as f64 / words as f64 * 100.0
}

/// Client for a LanguageTool HTTP server
pub struct LanguageToolClient {
    client: Client,
    base_url: String,
    language: String,
}

impl LanguageToolClient {
    pub fn new(base_url: &str, language: &str, config: &BackendConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
        })
    }

    /// Check that the server answers before handing out the client
    pub async fn probe(&self) -> BackendResult<()> {
        let response = self
            .client
            .get(format!("{}/v2/languages", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend: GRAMMAR_BACKEND,
                status,
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolClient {
    async fn check(&self, text: &str) -> BackendResult<Vec<GrammarMatch>> {
        let response = self
            .client
            .post(format!("{}/v2/check", self.base_url))
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend: GRAMMAR_BACKEND,
                status,
                body,
            });
        }

        let body = response.text().await?;
        parse_check_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<CheckMatch>,
}

#[derive(Debug, Deserialize)]
struct CheckMatch {
    #[serde(default)]
    message: String,
    rule: Option<CheckRule>,
}

#[derive(Debug, Deserialize)]
struct CheckRule {
    #[serde(default)]
    id: String,
}

fn parse_check_response(body: &str) -> BackendResult<Vec<GrammarMatch>> {
    let response: CheckResponse =
        serde_json::from_str(body).map_err(|e| BackendError::InvalidResponse {
            backend: GRAMMAR_BACKEND,
            message: e.to_string(),
        })?;

    Ok(response
        .matches
        .into_iter()
        .map(|m| GrammarMatch {
            rule_id: m.rule.map(|r| r.id).unwrap_or_default(),
            message: m.message,
        })
        .collect())
}

/// Connect to the configured LanguageTool server
pub async fn connect_language_tool(
    config: &BackendConfig,
) -> BackendResult<Arc<dyn GrammarChecker>> {
    let Some(url) = config.languagetool_url.as_deref() else {
        return Err(BackendError::NotConfigured {
            backend: GRAMMAR_BACKEND,
            reason: "RUBRIC_LANGUAGETOOL_URL not set".to_string(),
        });
    };

    let client = LanguageToolClient::new(url, &config.language, config)?;
    client.probe().await?;
    let checker: Arc<dyn GrammarChecker> = Arc::new(client);
    Ok(checker)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedChecker(Vec<GrammarMatch>);

    #[async_trait]
    impl GrammarChecker for FixedChecker {
        async fn check(&self, _text: &str) -> BackendResult<Vec<GrammarMatch>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenChecker;

    #[async_trait]
    impl GrammarChecker for BrokenChecker {
        async fn check(&self, _text: &str) -> BackendResult<Vec<GrammarMatch>> {
            Err(BackendError::Analysis {
                backend: GRAMMAR_BACKEND,
                message: "server went away".to_string(),
            })
        }
    }

    fn available(checker: impl GrammarChecker + 'static) -> Availability<dyn GrammarChecker> {
        let checker: Arc<dyn GrammarChecker> = Arc::new(checker);
        Availability::Available(checker)
    }

    fn rule(id: &str) -> GrammarMatch {
        GrammarMatch {
            rule_id: id.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn test_heuristic_counts_repeats_and_contractions() {
        // "the the" is one pair; "is is is" is one pair plus a leftover word
        assert_eq!(heuristic_error_count("I saw the the dog"), 1);
        assert_eq!(heuristic_error_count("it is is is fine"), 1);
        assert_eq!(heuristic_error_count("I dont know, it isnt fair"), 2);
        // punctuation between words is not a repeat
        assert_eq!(heuristic_error_count("no, no"), 0);
        assert_eq!(heuristic_error_count("the theory"), 0);
    }

    #[test]
    fn test_whitespace_rule_is_ignored() {
        let matches = vec![rule("MORFOLOGIK_RULE_EN_US"), rule(WHITESPACE_RULE), rule("")];
        assert_eq!(count_rule_violations(&matches), 1);
    }

    #[test]
    fn test_parse_check_response() {
        let body = r#"{"software":{"name":"LanguageTool"},"matches":[
            {"message":"Possible typo","rule":{"id":"MORFOLOGIK_RULE_EN_US"}},
            {"message":"Whitespace","rule":{"id":"WHITESPACE_RULE"}}
        ]}"#;
        let matches = parse_check_response(body).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].rule_id, "MORFOLOGIK_RULE_EN_US");
        assert!(parse_check_response("not json").is_err());
    }

    #[tokio::test]
    async fn test_assess_with_checker() {
        let checker = available(FixedChecker(vec![rule("A"), rule(WHITESPACE_RULE)]));
        let assessment =
            assess_grammar("one two three four five six seven eight nine ten", &checker).await;

        assert_eq!(assessment.error_count, 1);
        assert!((assessment.errors_per_100_words - 10.0).abs() < 1e-9);
        assert_eq!(assessment.note, "1 grammar issues detected by language-tool");
        assert!(!assessment.used_fallback);
    }

    #[tokio::test]
    async fn test_assess_falls_back_on_failure() {
        let checker = available(BrokenChecker);
        let assessment = assess_grammar("I dont like the the rain", &checker).await;

        assert_eq!(assessment.error_count, 2);
        assert!(assessment.used_fallback);
        assert!(assessment.note.starts_with("language-tool check failed:"));
        assert!(assessment.note.ends_with("2 heuristic grammar issues (fallback)"));
    }

    #[tokio::test]
    async fn test_assess_unavailable_and_empty() {
        let checker: Availability<dyn GrammarChecker> = Availability::Unavailable("off".into());

        let assessment = assess_grammar("Hello there", &checker).await;
        assert_eq!(assessment.note, "0 heuristic grammar issues (fallback)");

        let empty = assess_grammar("  ", &checker).await;
        assert_eq!(empty.errors_per_100_words, 0.0);
        assert_eq!(empty.note, "No words");
    }

    #[tokio::test]
    async fn test_unconfigured_connection_fails() {
        let result = connect_language_tool(&BackendConfig::default()).await;
        assert!(matches!(result, Err(BackendError::NotConfigured { .. })));
    }
}
