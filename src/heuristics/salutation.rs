use super::HeuristicScore;

const EXCITED_PHRASES: &[&str] = &["i am excited to introduce", "i'm excited to introduce"];
const FORMAL_GREETINGS: &[&str] = &["good morning", "good afternoon", "good evening", "good day"];
const CASUAL_GREETINGS: &[&str] = &["hi ", "hello ", "hi,", "hello,"];

/// Band the opening greeting. Checked in priority order; the first band that
/// matches is the only one awarded.
pub fn salutation_score(text: &str) -> HeuristicScore {
    let lower = text.to_lowercase();

    if EXCITED_PHRASES.iter().any(|p| lower.contains(p)) {
        return HeuristicScore::new(5, "Excellent salutation phrase found.");
    }

    if let Some(greeting) = FORMAL_GREETINGS.iter().find(|g| lower.contains(*g)) {
        return HeuristicScore::new(4, format!("Found greeting '{}'.", greeting));
    }

    if let Some(greeting) = CASUAL_GREETINGS.iter().find(|g| lower.contains(*g)) {
        let bare = greeting.trim();
        return HeuristicScore::new(2, format!("Found greeting '{}'.", bare));
    }

    HeuristicScore::new(0, "No salutation detected.")
}
