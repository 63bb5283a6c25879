use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::{round_to, Criterion};

/// One value in a criterion's breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentValue {
    Number(f64),
    Label(String),
}

impl ComponentValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ComponentValue::Number(n) => Some(*n),
            ComponentValue::Label(_) => None,
        }
    }
}

/// Ordered component breakdown, serialized as a JSON object in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    entries: Vec<(String, ComponentValue)>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a numeric sub-score
    pub fn number(mut self, label: &str, value: f64) -> Self {
        self.entries
            .push((label.to_string(), ComponentValue::Number(value)));
        self
    }

    /// Append a textual component (band labels)
    pub fn label(mut self, label: &str, value: &str) -> Self {
        self.entries
            .push((label.to_string(), ComponentValue::Label(value.to_string())));
        self
    }

    pub fn get(&self, label: &str) -> Option<&ComponentValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentValue)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }
}

impl Serialize for Components {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Score and feedback for one rubric criterion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionResult {
    #[serde(rename = "criterion")]
    pub name: String,
    pub components: Components,
    pub score: f64,
    pub max_score: u32,
    pub feedback: String,
}

impl CriterionResult {
    /// Build a result for `criterion`, clamping the score into `[0, max_score]`
    pub fn new(criterion: Criterion, components: Components, score: f64, feedback: String) -> Self {
        let max_score = criterion.max_score();
        let score = if score.is_finite() {
            score.clamp(0.0, max_score as f64)
        } else {
            0.0
        };
        Self {
            name: criterion.name().to_string(),
            components,
            score,
            max_score,
            feedback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub attained: f64,
    pub possible: u32,
}

/// Full scoring outcome for one transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricResult {
    /// Percentage of possible points, rounded to 2 decimals
    pub overall_score: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    /// Duration the speech rate was computed from (None = assumed one minute)
    pub duration_seconds_used: Option<f64>,
    pub per_criterion: Vec<CriterionResult>,
    pub totals: Totals,
}

impl RubricResult {
    /// Aggregate criterion results into the overall score
    pub fn from_criteria(
        word_count: usize,
        sentence_count: usize,
        duration_seconds_used: Option<f64>,
        per_criterion: Vec<CriterionResult>,
    ) -> Self {
        let attained: f64 = per_criterion.iter().map(|c| c.score).sum();
        let possible: u32 = per_criterion.iter().map(|c| c.max_score).sum();
        let overall_score = if possible > 0 {
            round_to(attained / possible as f64 * 100.0, 2)
        } else {
            0.0
        };

        Self {
            overall_score,
            word_count,
            sentence_count,
            duration_seconds_used,
            per_criterion,
            totals: Totals {
                attained: round_to(attained, 3),
                possible,
            },
        }
    }

    /// Look up a criterion result
    pub fn criterion(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.per_criterion.iter().find(|c| c.name == criterion.name())
    }
}
