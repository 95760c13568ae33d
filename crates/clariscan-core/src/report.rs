//! The renderable model built from an admitted result.

use serde::Serialize;

use crate::chain::{StructuredConsequence, render, render_structured};
use crate::must_know::{ConsequenceNarrative, Deadline, Percentage};
use crate::payload::{AnalysisResult, Clause};
use crate::risk::{PresentationCategory, RiskOverview, classify};

pub const DISCLAIMER: &str =
    "This analysis is for informational purposes only and does not constitute legal advice.";

/// Both views of one narrative, plus its deadlines and percentages.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MustKnowView {
    pub deadlines: Vec<Deadline>,
    pub percentages: Vec<Percentage>,
    pub chain: Vec<String>,
    pub structured: Vec<StructuredConsequence>,
}

impl MustKnowView {
    pub fn from_narrative(narrative: &ConsequenceNarrative) -> Self {
        Self {
            deadlines: narrative.deadlines.clone(),
            percentages: narrative.percentages.clone(),
            chain: render(narrative),
            structured: render_structured(narrative),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty() && self.percentages.is_empty() && self.chain.is_empty()
    }
}

/// One clause ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseView {
    pub category: PresentationCategory,
    pub clause: Clause,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_know: Option<MustKnowView>,
}

/// Everything the presentation layer needs for an admitted contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub overview: RiskOverview,
    pub must_know: MustKnowView,
    pub clauses: Vec<ClauseView>,
    pub disclaimer: &'static str,
}

impl AnalysisReport {
    pub fn build(result: &AnalysisResult) -> Self {
        let clauses = result
            .clauses
            .iter()
            .map(|clause| ClauseView {
                category: classify(clause.analysis.risk_level),
                clause: clause.clone(),
                must_know: clause
                    .analysis
                    .must_know
                    .as_ref()
                    .map(MustKnowView::from_narrative),
            })
            .collect();

        Self {
            confidence: result.confidence,
            overview: RiskOverview::tally(result.risk_levels()),
            must_know: MustKnowView::from_narrative(&result.must_know),
            clauses,
            disclaimer: DISCLAIMER,
        }
    }

    /// True when the service flagged nothing at all.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.must_know.is_empty()
    }
}
