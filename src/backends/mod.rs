pub mod config;
pub mod grammar;
pub mod semantic;
pub mod sentiment;

pub use config::*;
pub use grammar::*;
pub use semantic::*;
pub use sentiment::*;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::BackendError;

/// Outcome of connecting an optional backend, decided once per process
pub enum Availability<T: ?Sized> {
    Available(Arc<T>),
    Unavailable(String),
}

impl<T: ?Sized> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }
}

/// A backend handle that is connected lazily, at most once.
///
/// Concurrent first callers wait on the same initialization and all observe
/// the same outcome. A failed connection stays unavailable; there is no retry.
pub struct LazyBackend<T: ?Sized> {
    name: &'static str,
    cell: OnceCell<Availability<T>>,
}

impl<T: ?Sized> LazyBackend<T> {
    /// Slot that connects on first use
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
        }
    }

    /// Slot holding an already constructed backend
    pub fn ready(name: &'static str, backend: Arc<T>) -> Self {
        Self {
            name,
            cell: OnceCell::new_with(Some(Availability::Available(backend))),
        }
    }

    /// Slot that is permanently unavailable
    pub fn unavailable(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            cell: OnceCell::new_with(Some(Availability::Unavailable(reason.into()))),
        }
    }

    /// Whether the connection outcome has been decided
    pub fn is_resolved(&self) -> bool {
        self.cell.initialized()
    }

    /// Connect on first call, then return the cached outcome
    pub async fn resolve<F, Fut>(&self, connect: F) -> &Availability<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<T>, BackendError>>,
    {
        let name = self.name;
        self.cell
            .get_or_init(|| async move {
                match connect().await {
                    Ok(backend) => {
                        info!("{} backend available", name);
                        Availability::Available(backend)
                    }
                    Err(e) => {
                        warn!("{} backend unavailable, using fallback: {}", name, e);
                        Availability::Unavailable(e.to_string())
                    }
                }
            })
            .await
    }
}

/// The three optional analyzers the engine consults
pub struct Backends {
    config: BackendConfig,
    grammar: LazyBackend<dyn GrammarChecker>,
    sentiment: LazyBackend<dyn SentimentAnalyzer>,
    semantic: LazyBackend<dyn EmbeddingModel>,
}

impl Backends {
    /// Backends connected lazily from `config`
    pub fn from_config(config: BackendConfig) -> Self {
        Self {
            config,
            grammar: LazyBackend::new(GRAMMAR_BACKEND),
            sentiment: LazyBackend::new(SENTIMENT_BACKEND),
            semantic: LazyBackend::new(SEMANTIC_BACKEND),
        }
    }

    /// All backends unavailable; every feature uses its heuristic fallback
    pub fn disabled() -> Self {
        Self {
            config: BackendConfig::offline(),
            grammar: LazyBackend::unavailable(GRAMMAR_BACKEND, "disabled"),
            sentiment: LazyBackend::unavailable(SENTIMENT_BACKEND, "disabled"),
            semantic: LazyBackend::unavailable(SEMANTIC_BACKEND, "disabled"),
        }
    }

    /// Use an already constructed grammar checker
    pub fn with_grammar(mut self, checker: Arc<dyn GrammarChecker>) -> Self {
        self.grammar = LazyBackend::ready(GRAMMAR_BACKEND, checker);
        self
    }

    /// Use an already constructed sentiment analyzer
    pub fn with_sentiment(mut self, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = LazyBackend::ready(SENTIMENT_BACKEND, analyzer);
        self
    }

    /// Use an already constructed embedding model
    pub fn with_semantic(mut self, model: Arc<dyn EmbeddingModel>) -> Self {
        self.semantic = LazyBackend::ready(SEMANTIC_BACKEND, model);
        self
    }

    pub async fn grammar(&self) -> &Availability<dyn GrammarChecker> {
        self.grammar
            .resolve(|| grammar::connect_language_tool(&self.config))
            .await
    }

    pub async fn sentiment(&self) -> &Availability<dyn SentimentAnalyzer> {
        self.sentiment
            .resolve(|| sentiment::load_vader(&self.config))
            .await
    }

    pub async fn semantic(&self) -> &Availability<dyn EmbeddingModel> {
        self.semantic
            .resolve(|| semantic::connect_embeddings(&self.config))
            .await
    }
}

impl Default for Backends {
    fn default() -> Self {
        Self::from_config(BackendConfig::default())
    }
}
