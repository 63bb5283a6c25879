use serde::Serialize;

use super::HeuristicScore;

/// Narrative stages of an introduction, in the order they are expected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowStage {
    Salutation,
    Name,
    Age,
    School,
    Additional,
    Closing,
}

impl FlowStage {
    pub const ORDER: [FlowStage; 6] = [
        FlowStage::Salutation,
        FlowStage::Name,
        FlowStage::Age,
        FlowStage::School,
        FlowStage::Additional,
        FlowStage::Closing,
    ];

    /// Literal phrases that mark this stage
    fn phrases(self) -> &'static [&'static str] {
        match self {
            FlowStage::Salutation => &[
                "hi",
                "hello",
                "good morning",
                "good afternoon",
                "good evening",
                "good day",
                "i am excited",
            ],
            FlowStage::Name => &["name", "i am", "i'm", "my name is"],
            FlowStage::Age => &["age", "years old"],
            FlowStage::School => &["school", "class", "college"],
            FlowStage::Additional => &[
                "hobbies",
                "interest",
                "hobby",
                "fun fact",
                "strength",
                "achievement",
                "ambition",
                "goal",
                "dream",
            ],
            FlowStage::Closing => &[
                "thank you",
                "thanks for listening",
                "thank you for listening",
                "thankyou",
            ],
        }
    }
}

/// Earliest offset (in the lowercased text) of any marker of each stage
pub fn stage_offsets(text: &str) -> Vec<(FlowStage, Option<usize>)> {
    let lower = text.to_lowercase();
    FlowStage::ORDER
        .iter()
        .map(|&stage| {
            let earliest = stage.phrases().iter().filter_map(|p| lower.find(p)).min();
            (stage, earliest)
        })
        .collect()
}

/// All-or-nothing ordering check.
///
/// Stages without a marker are skipped; every present stage must start at or
/// after the previous present stage for the 5 points.
pub fn flow_score(text: &str) -> HeuristicScore {
    let mut previous: Option<usize> = None;
    let mut in_order = true;

    for (stage, offset) in stage_offsets(text) {
        let Some(offset) = offset else {
            continue;
        };
        if previous.is_some_and(|p| offset < p) {
            tracing::debug!("Flow broken at {:?} (offset {})", stage, offset);
            in_order = false;
            break;
        }
        previous = Some(offset);
    }

    if in_order {
        HeuristicScore::new(5, "Flow followed")
    } else {
        HeuristicScore::new(0, "Flow not followed / out of order")
    }
}
