//! Risk levels and their presentation categories.
//!
//! The analysis service labels each clause `Low`, `Medium` or `High`. Anything
//! else it sends (other casings aside) collapses to `Low` so a malformed label
//! degrades the display instead of breaking it.

use serde::Serialize;
use serde_json::Value;

/// Risk level attached to a clause by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parse a service label. Case-insensitive; unknown labels map to `Low`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Parse a JSON value. Non-string values map to `Low`.
    pub fn from_value(value: &Value) -> Self {
        value.as_str().map(Self::from_label).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// How a clause should be presented to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationCategory {
    Critical,
    Caution,
    Safe,
}

impl PresentationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Caution => "caution",
            Self::Safe => "safe",
        }
    }
}

/// Map a risk level to its presentation category.
pub fn classify(level: RiskLevel) -> PresentationCategory {
    match level {
        RiskLevel::High => PresentationCategory::Critical,
        RiskLevel::Medium => PresentationCategory::Caution,
        RiskLevel::Low => PresentationCategory::Safe,
    }
}

/// Classify a raw service label directly.
pub fn classify_label(label: &str) -> PresentationCategory {
    classify(RiskLevel::from_label(label))
}

/// Score weights per level. A document at or above `HIGH_THRESHOLD` is
/// high risk overall; at or above `MEDIUM_THRESHOLD` it is medium.
const HIGH_WEIGHT: u32 = 5;
const MEDIUM_WEIGHT: u32 = 3;
const LOW_WEIGHT: u32 = 1;
const HIGH_THRESHOLD: u32 = 50;
const MEDIUM_THRESHOLD: u32 = 25;

/// Document-level tally of clause risk levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RiskOverview {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub score: u32,
    pub overall: RiskLevel,
}

impl RiskOverview {
    /// Tally a sequence of clause risk levels.
    pub fn tally(levels: impl IntoIterator<Item = RiskLevel>) -> Self {
        let mut overview = Self::default();
        for level in levels {
            match level {
                RiskLevel::High => overview.high += 1,
                RiskLevel::Medium => overview.medium += 1,
                RiskLevel::Low => overview.low += 1,
            }
        }
        overview.score =
            overview.high * HIGH_WEIGHT + overview.medium * MEDIUM_WEIGHT + overview.low * LOW_WEIGHT;
        overview.overall = if overview.score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if overview.score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        overview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_levels_map_to_categories() {
        assert_eq!(classify(RiskLevel::High), PresentationCategory::Critical);
        assert_eq!(classify(RiskLevel::Medium), PresentationCategory::Caution);
        assert_eq!(classify(RiskLevel::Low), PresentationCategory::Safe);
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(classify_label("High"), PresentationCategory::Critical);
        assert_eq!(classify_label("high"), PresentationCategory::Critical);
        assert_eq!(classify_label(" MEDIUM "), PresentationCategory::Caution);
    }

    #[test]
    fn unknown_labels_are_safe() {
        for label in ["", "Severe", "critical", "unknown", "Lowish"] {
            assert_eq!(classify_label(label), PresentationCategory::Safe, "{label:?}");
        }
    }

    #[test]
    fn non_string_values_fall_back_to_low() {
        assert_eq!(RiskLevel::from_value(&json!(3)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_value(&json!(null)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_value(&json!({"level": "High"})), RiskLevel::Low);
        assert_eq!(RiskLevel::from_value(&json!("High")), RiskLevel::High);
    }

    #[test]
    fn overview_empty_document_is_low() {
        let overview = RiskOverview::tally([]);
        assert_eq!(overview.score, 0);
        assert_eq!(overview.overall, RiskLevel::Low);
    }

    #[test]
    fn overview_thresholds() {
        // 5 high = 25 → medium
        let medium = RiskOverview::tally(std::iter::repeat_n(RiskLevel::High, 5));
        assert_eq!(medium.score, 25);
        assert_eq!(medium.overall, RiskLevel::Medium);

        // 10 high = 50 → high
        let high = RiskOverview::tally(std::iter::repeat_n(RiskLevel::High, 10));
        assert_eq!(high.overall, RiskLevel::High);

        // 8 medium = 24 → low
        let low = RiskOverview::tally(std::iter::repeat_n(RiskLevel::Medium, 8));
        assert_eq!(low.score, 24);
        assert_eq!(low.overall, RiskLevel::Low);
    }

    #[test]
    fn overview_counts_each_level() {
        let overview =
            RiskOverview::tally([RiskLevel::High, RiskLevel::Low, RiskLevel::Medium, RiskLevel::Low]);
        assert_eq!((overview.high, overview.medium, overview.low), (1, 1, 2));
        assert_eq!(overview.score, 10);
    }
}
