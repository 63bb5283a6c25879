use serde::Serialize;

/// A transcript submitted for scoring: trimmed text plus an optional duration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    text: String,
    duration_seconds: Option<f64>,
}

impl Transcript {
    /// Create a transcript. A duration that is not a positive finite number
    /// is treated as absent.
    pub fn new(text: impl Into<String>, duration_seconds: Option<f64>) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim().to_string(),
            duration_seconds: duration_seconds.filter(|d| d.is_finite() && *d > 0.0),
        }
    }

    /// The trimmed transcript text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Spoken duration in seconds, if known
    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
