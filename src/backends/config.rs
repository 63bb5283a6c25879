use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_EMBEDDINGS_MODEL: &str = "all-MiniLM-L6-v2";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the optional linguistic backends
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of a LanguageTool server (e.g. "http://localhost:8081")
    pub languagetool_url: Option<String>,
    /// Language code sent to LanguageTool
    pub language: String,
    /// OpenAI-compatible embeddings endpoint (full URL)
    pub embeddings_url: Option<String>,
    /// Bearer token for the embeddings endpoint
    pub embeddings_api_key: Option<String>,
    /// Embedding model name
    pub embeddings_model: String,
    /// Whether the lexicon sentiment analyzer may be loaded
    pub sentiment_enabled: bool,
    /// Per-request timeout for remote backends
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            languagetool_url: None,
            language: DEFAULT_LANGUAGE.to_string(),
            embeddings_url: None,
            embeddings_api_key: None,
            embeddings_model: DEFAULT_EMBEDDINGS_MODEL.to_string(),
            sentiment_enabled: true,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl BackendConfig {
    /// Create config from environment variables
    ///
    /// Every variable is optional; a missing backend URL leaves that backend
    /// unavailable. A malformed timeout is an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let request_timeout = match non_empty_var("RUBRIC_BACKEND_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .with_context(|| format!("Invalid RUBRIC_BACKEND_TIMEOUT_SECS: {:?}", raw))?,
            ),
            None => defaults.request_timeout,
        };

        let sentiment_disabled = non_empty_var("RUBRIC_DISABLE_SENTIMENT")
            .is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            languagetool_url: non_empty_var("RUBRIC_LANGUAGETOOL_URL"),
            language: non_empty_var("RUBRIC_LANGUAGE").unwrap_or(defaults.language),
            embeddings_url: non_empty_var("RUBRIC_EMBEDDINGS_URL"),
            embeddings_api_key: non_empty_var("RUBRIC_EMBEDDINGS_API_KEY"),
            embeddings_model: non_empty_var("RUBRIC_EMBEDDINGS_MODEL")
                .unwrap_or(defaults.embeddings_model),
            sentiment_enabled: !sentiment_disabled,
            request_timeout,
        })
    }

    /// Config with every backend switched off
    pub fn offline() -> Self {
        Self {
            sentiment_enabled: false,
            ..Self::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BackendConfig::default();
        assert!(config.languagetool_url.is_none());
        assert!(config.embeddings_url.is_none());
        assert!(config.sentiment_enabled);
        assert_eq!(config.language, "en-US");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_offline_config() {
        let config = BackendConfig::offline();
        assert!(!config.sentiment_enabled);
        assert!(config.languagetool_url.is_none());
    }
}
