use std::sync::Arc;

use tracing::warn;

use super::{Availability, BackendConfig};
use crate::error::{BackendError, BackendResult};
use crate::models::display_float;

pub const SENTIMENT_BACKEND: &str = "vader";

/// Normalized polarity reported when no analyzer can be used
pub const NEUTRAL_SENTIMENT: f64 = 0.5;

/// A lexicon/rule based sentiment scorer
pub trait SentimentAnalyzer: Send + Sync {
    /// Compound polarity in [-1, 1]
    fn compound(&self, text: &str) -> BackendResult<f64>;
}

/// VADER lexicon analyzer
pub struct VaderAnalyzer {
    analyzer: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

impl VaderAnalyzer {
    /// Build the analyzer over the bundled lexicon
    pub fn load() -> Self {
        Self {
            analyzer: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }
}

impl SentimentAnalyzer for VaderAnalyzer {
    fn compound(&self, text: &str) -> BackendResult<f64> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }
        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .filter(|c| c.is_finite())
            .ok_or_else(|| BackendError::Analysis {
                backend: SENTIMENT_BACKEND,
                message: "no compound score".to_string(),
            })
    }
}

/// Normalized sentiment and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentAssessment {
    /// Polarity rescaled into [0, 1]
    pub normalized: f64,
    /// Raw compound score, when an analyzer produced one
    pub compound: Option<f64>,
    pub note: String,
}

/// Rescale a compound score from [-1, 1] into [0, 1]
pub fn normalize_compound(compound: f64) -> f64 {
    ((compound + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Score sentiment, or report neutral when the analyzer is missing or fails
pub fn assess_sentiment(
    text: &str,
    analyzer: &Availability<dyn SentimentAnalyzer>,
) -> SentimentAssessment {
    match analyzer {
        Availability::Available(analyzer) => match analyzer.compound(text) {
            Ok(compound) => SentimentAssessment {
                normalized: normalize_compound(compound),
                compound: Some(compound),
                note: format!("VADER compound raw={}", display_float(compound)),
            },
            Err(e) => {
                warn!("Sentiment analysis failed, using neutral: {}", e);
                SentimentAssessment {
                    normalized: NEUTRAL_SENTIMENT,
                    compound: None,
                    note: format!("VADER failed ({}); using neutral fallback", e),
                }
            }
        },
        Availability::Unavailable(_) => SentimentAssessment {
            normalized: NEUTRAL_SENTIMENT,
            compound: None,
            note: "VADER not available; using neutral fallback".to_string(),
        },
    }
}

/// Load the lexicon analyzer unless it has been switched off
pub async fn load_vader(config: &BackendConfig) -> BackendResult<Arc<dyn SentimentAnalyzer>> {
    if !config.sentiment_enabled {
        return Err(BackendError::Disabled {
            backend: SENTIMENT_BACKEND,
        });
    }
    let analyzer: Arc<dyn SentimentAnalyzer> = Arc::new(VaderAnalyzer::load());
    Ok(analyzer)
}
