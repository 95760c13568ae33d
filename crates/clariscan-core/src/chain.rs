//! Presentation views over a [`ConsequenceNarrative`].
//!
//! `render` gives the flat chain of sentences; `render_structured` gives
//! condition/result pairs. Both read the same records in the same order.

use serde::Serialize;

use crate::must_know::{ConsequenceNarrative, ConsequenceRecord};

/// Separator between condition and result in the flat view.
const CONDITION_ARROW: &str = " → ";

/// A condition/result pair for the structured list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredConsequence {
    pub condition: String,
    pub result: String,
}

/// Flat sentence for one record.
pub fn sentence(record: &ConsequenceRecord) -> String {
    if record.condition.is_unconditional() {
        record.result.clone()
    } else {
        format!("{}{CONDITION_ARROW}{}", record.condition.as_str(), record.result)
    }
}

/// The narrative as an ordered list of display sentences.
pub fn render(narrative: &ConsequenceNarrative) -> Vec<String> {
    narrative.consequences.iter().map(sentence).collect()
}

/// The narrative as ordered condition/result pairs. Records without a
/// condition show `"unconditional"`.
pub fn render_structured(narrative: &ConsequenceNarrative) -> Vec<StructuredConsequence> {
    narrative
        .consequences
        .iter()
        .map(|record| StructuredConsequence {
            condition: record.condition.as_str().to_string(),
            result: record.result.clone(),
        })
        .collect()
}
