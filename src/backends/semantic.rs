use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Availability, BackendConfig};
use crate::error::{BackendError, BackendResult};
use crate::models::{display_float, round_to};

pub const SEMANTIC_BACKEND: &str = "embeddings";

/// Description of what an introduction is expected to contain
pub const REFERENCE_PHRASE: &str = "Introduction/self introduction content expected";

/// Upper bound of the semantic bonus
pub const MAX_SEMANTIC_BONUS: f64 = 10.0;

/// A sentence embedding model
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// One embedding per input, in input order
    async fn embed(&self, inputs: &[&str]) -> BackendResult<Vec<Vec<f32>>>;
}

/// Semantic bonus and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticAssessment {
    /// Bonus in [0, 10]
    pub bonus: f64,
    /// Normalized similarity in [0, 1], when the model produced one
    pub similarity: Option<f64>,
    pub note: String,
}

/// Bonus used without a model: share of must-have keywords found, scaled to 10
pub fn keyword_fallback_bonus(keyword_hits: usize, total_keywords: usize) -> f64 {
    if total_keywords == 0 {
        return 0.0;
    }
    (keyword_hits as f64 / total_keywords as f64 * MAX_SEMANTIC_BONUS).min(MAX_SEMANTIC_BONUS)
}

/// Cosine similarity; None for mismatched or zero-length vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Compare the transcript with the reference phrase.
///
/// Without a model, or when the model fails, the bonus comes from keyword
/// coverage instead.
pub async fn assess_semantic(
    text: &str,
    keyword_hits: usize,
    total_keywords: usize,
    model: &Availability<dyn EmbeddingModel>,
) -> SemanticAssessment {
    let fallback = keyword_fallback_bonus(keyword_hits, total_keywords);

    let model = match model {
        Availability::Available(model) => model,
        Availability::Unavailable(_) => {
            return SemanticAssessment {
                bonus: fallback,
                similarity: None,
                note: "Semantic model not available or not used.".to_string(),
            };
        }
    };

    match similarity_to_reference(model.as_ref(), text).await {
        Ok(cosine) => {
            let similarity = ((cosine + 1.0) / 2.0).clamp(0.0, 1.0);
            debug!("Semantic cosine={:.4} normalized={:.4}", cosine, similarity);
            SemanticAssessment {
                bonus: similarity * MAX_SEMANTIC_BONUS,
                similarity: Some(similarity),
                note: format!(
                    "Semantic similarity normalized={}",
                    display_float(round_to(similarity, 3))
                ),
            }
        }
        Err(e) => {
            warn!("Semantic similarity failed, using keyword coverage: {}", e);
            SemanticAssessment {
                bonus: fallback,
                similarity: None,
                note: format!("Semantic compute failed: {}", e),
            }
        }
    }
}

async fn similarity_to_reference(model: &dyn EmbeddingModel, text: &str) -> BackendResult<f64> {
    let embeddings = model.embed(&[text, REFERENCE_PHRASE]).await?;
    let [transcript, reference] = embeddings.as_slice() else {
        return Err(BackendError::InvalidResponse {
            backend: SEMANTIC_BACKEND,
            message: format!("expected 2 embeddings, got {}", embeddings.len()),
        });
    };
    cosine_similarity(transcript, reference).ok_or_else(|| BackendError::InvalidResponse {
        backend: SEMANTIC_BACKEND,
        message: "embeddings are empty or differ in dimension".to_string(),
    })
}

/// Client for an OpenAI-compatible embeddings endpoint
pub struct EmbeddingsClient {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl EmbeddingsClient {
    pub fn new(url: &str, config: &BackendConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key: config.embeddings_api_key.clone(),
            model: config.embeddings_model.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingModel for EmbeddingsClient {
    async fn embed(&self, inputs: &[&str]) -> BackendResult<Vec<Vec<f32>>> {
        let request = EmbeddingsRequest {
            model: &self.model,
            input: inputs,
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend: SEMANTIC_BACKEND,
                status,
                body,
            });
        }

        let body = response.text().await?;
        parse_embeddings_response(&body, inputs.len())
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

fn parse_embeddings_response(body: &str, expected: usize) -> BackendResult<Vec<Vec<f32>>> {
    let response: EmbeddingsResponse =
        serde_json::from_str(body).map_err(|e| BackendError::InvalidResponse {
            backend: SEMANTIC_BACKEND,
            message: e.to_string(),
        })?;

    if response.data.len() != expected {
        return Err(BackendError::InvalidResponse {
            backend: SEMANTIC_BACKEND,
            message: format!("expected {} embeddings, got {}", expected, response.data.len()),
        });
    }

    let mut data = response.data;
    // Entries may arrive out of order; fall back to position when unindexed
    data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

/// Connect to the configured embeddings endpoint.
///
/// The reference phrase is embedded once as a probe so that an unreachable
/// or misconfigured endpoint is detected at initialization.
pub async fn connect_embeddings(config: &BackendConfig) -> BackendResult<Arc<dyn EmbeddingModel>> {
    let Some(url) = config.embeddings_url.as_deref() else {
        return Err(BackendError::NotConfigured {
            backend: SEMANTIC_BACKEND,
            reason: "RUBRIC_EMBEDDINGS_URL not set".to_string(),
        });
    };

    let client = EmbeddingsClient::new(url, config)?;
    client.embed(&[REFERENCE_PHRASE]).await?;
    let model: Arc<dyn EmbeddingModel> = Arc::new(client);
    Ok(model)
}
