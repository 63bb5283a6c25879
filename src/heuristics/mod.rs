pub mod flow;
pub mod keywords;
pub mod salutation;

pub use flow::*;
pub use keywords::*;
pub use salutation::*;

/// Points awarded by a phrase heuristic plus the message shown to the speaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicScore {
    pub points: u32,
    pub message: String,
}

impl HeuristicScore {
    pub fn new(points: u32, message: impl Into<String>) -> Self {
        Self {
            points,
            message: message.into(),
        }
    }
}

/// Result of running the content heuristics over a transcript
#[derive(Debug, Clone)]
pub struct ContentFindings {
    pub salutation: HeuristicScore,
    pub flow: HeuristicScore,
    /// Keywords found, in keyword-list order
    pub keywords_found: Vec<String>,
}

impl ContentFindings {
    pub fn keyword_hits(&self) -> usize {
        self.keywords_found.len()
    }
}

/// Apply the deterministic content heuristics
///
/// 1. Band the salutation
/// 2. Detect must-have keywords
/// 3. Check the narrative ordering
pub fn apply_heuristics(text: &str, keywords: &[String]) -> ContentFindings {
    let salutation = salutation_score(text);
    let keywords_found = detect_keywords(text, keywords)
        .into_iter()
        .map(str::to_string)
        .collect();
    let flow = flow_score(text);

    ContentFindings {
        salutation,
        flow,
        keywords_found,
    }
}
