pub mod backends;
pub mod error;
pub mod heuristics;
pub mod io;
pub mod metrics;
pub mod models;
pub mod scoring;

pub use backends::{BackendConfig, Backends, EmbeddingModel, GrammarChecker, SentimentAnalyzer};
pub use error::{BackendError, BackendResult};
pub use heuristics::{apply_heuristics, ContentFindings, CANONICAL_KEYWORDS};
pub use io::{export_rows, load_transcript, write_csv_file, write_json, ExportRow, ScoreReport};
pub use models::{Criterion, CriterionResult, RubricResult, Transcript};
pub use scoring::{score_transcript, RubricEngine};
