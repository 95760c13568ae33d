//! "What you must know" normalisation.
//!
//! The analysis service has shipped several shapes of its `user_must_know`
//! block over time:
//!
//! - `deadlines` + `percentages` only
//! - the above plus `consequences` (flat codes) and
//!   `what_happens_if_you_dont_comply` (flat sentences)
//! - the above plus `consequence_chain` (condition/result records)
//!
//! Each field is read by its own adapter; absent or wrongly-typed fields
//! contribute nothing. The adapters feed one ordered sequence:
//!
//! 1. one record per deadline
//! 2. one record per percentage
//! 3. `consequences`, resolved through [`describe_consequence`]
//! 4. `what_happens_if_you_dont_comply`, verbatim
//! 5. `consequence_chain`, kept as condition/result pairs
//!
//! Records with a blank result are dropped. Duplicates are kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};
use tracing::debug;

use crate::deserializers::{
    de_option_f64_forgiving, de_option_string_forgiving, de_string_forgiving,
};

/// A time obligation found in the document.
///
/// Every field is read forgivingly: a null or mistyped value counts as absent
/// and the rest of the deadline is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    #[serde(
        default,
        deserialize_with = "de_option_f64_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub unit: String,
    #[serde(
        default,
        deserialize_with = "de_option_string_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub raw: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_option_string_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub applies_to: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_option_string_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger: Option<String>,
}

impl Deadline {
    /// Human-readable span: the raw text when present, else `"<value> <unit>"`.
    /// Empty when neither is available.
    pub fn phrase(&self) -> String {
        if let Some(raw) = non_blank(self.raw.as_deref()) {
            return raw.to_string();
        }
        match self.value {
            Some(value) if !self.unit.trim().is_empty() => {
                format!("{} {}", format_number(value), self.unit.trim())
            }
            _ => String::new(),
        }
    }
}

/// A monetary or proportional penalty found in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentage {
    #[serde(
        default,
        deserialize_with = "de_option_f64_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub raw: String,
    #[serde(default, deserialize_with = "de_string_forgiving")]
    pub context: String,
    #[serde(
        default,
        deserialize_with = "de_option_string_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub frequency: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_option_string_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger: Option<String>,
}

impl Percentage {
    /// Human-readable amount: the raw text when present, else `"<value>%"`.
    /// Empty when neither is available.
    pub fn phrase(&self) -> String {
        if let Some(raw) = non_blank(Some(&self.raw)) {
            return raw.to_string();
        }
        self.value
            .map(|value| format!("{}%", format_number(value)))
            .unwrap_or_default()
    }
}

/// Condition half of a consequence record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Unconditional,
    When(String),
}

impl Condition {
    pub const UNCONDITIONAL: &'static str = "unconditional";

    /// Blank text and the literal `"unconditional"` both mean no condition.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::UNCONDITIONAL) {
            Self::Unconditional
        } else {
            Self::When(text.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unconditional => Self::UNCONDITIONAL,
            Self::When(text) => text,
        }
    }

    pub fn is_unconditional(&self) -> bool {
        matches!(self, Self::Unconditional)
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One step of a consequence narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsequenceRecord {
    pub condition: Condition,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obligation_type: Option<String>,
}

impl ConsequenceRecord {
    pub fn unconditional(result: impl Into<String>) -> Self {
        Self {
            condition: Condition::Unconditional,
            result: result.into(),
            obligation_type: None,
        }
    }

    fn is_blank(&self) -> bool {
        self.result.trim().is_empty()
    }
}

/// Canonical must-know structure, rebuilt for every analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConsequenceNarrative {
    pub deadlines: Vec<Deadline>,
    pub percentages: Vec<Percentage>,
    pub consequences: Vec<ConsequenceRecord>,
}

impl ConsequenceNarrative {
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty() && self.percentages.is_empty() && self.consequences.is_empty()
    }

    /// Express the consequence sequence in the `consequence_chain` wire
    /// shape. Normalising the result yields the same records.
    pub fn to_chain_payload(&self) -> Value {
        let chain: Vec<Value> = self
            .consequences
            .iter()
            .map(|record| {
                json!({
                    "condition": record.condition.as_str(),
                    "result": record.result,
                    "obligation_type": record.obligation_type,
                })
            })
            .collect();
        json!({ "consequence_chain": chain })
    }
}

/// Sentences for the consequence codes the service emits.
const CONSEQUENCE_SENTENCES: &[(&str, &str)] = &[
    ("penalty", "Financial penalty may be charged"),
    ("termination", "The agreement may be terminated"),
    ("service_suspension", "Your service may be suspended"),
];

/// Resolve a consequence code to a sentence. Unknown codes come back verbatim.
pub fn describe_consequence(code: &str) -> &str {
    let key = code.trim();
    CONSEQUENCE_SENTENCES
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, sentence)| *sentence)
        .unwrap_or(code)
}

/// Build the canonical narrative from a raw `user_must_know` value.
///
/// Never fails: a non-object input yields an empty narrative.
pub fn normalize(raw: &Value) -> ConsequenceNarrative {
    let deadlines: Vec<Deadline> = parse_items(raw, "deadlines");
    let percentages: Vec<Percentage> = parse_items(raw, "percentages");

    let mut consequences = Vec::new();
    consequences.extend(deadline_records(&deadlines));
    consequences.extend(percentage_records(&percentages));
    consequences.extend(code_records(raw));
    consequences.extend(compliance_records(raw));
    consequences.extend(chain_records(raw));
    consequences.retain(|record| !record.is_blank());

    ConsequenceNarrative {
        deadlines,
        percentages,
        consequences,
    }
}

// ── Field adapters ──

/// `"missing <deadline>"` for each deadline.
pub fn deadline_records(deadlines: &[Deadline]) -> Vec<ConsequenceRecord> {
    deadlines
        .iter()
        .map(|deadline| {
            let phrase = deadline.phrase();
            if phrase.is_empty() {
                ConsequenceRecord::unconditional(String::new())
            } else {
                ConsequenceRecord::unconditional(format!("missing {phrase}"))
            }
        })
        .collect()
}

/// `"<amount> <context> applies if the related obligation is missed"` for each percentage.
pub fn percentage_records(percentages: &[Percentage]) -> Vec<ConsequenceRecord> {
    percentages
        .iter()
        .map(|percentage| {
            let phrase = percentage.phrase();
            if phrase.is_empty() {
                return ConsequenceRecord::unconditional(String::new());
            }
            let context = percentage.context.trim().to_lowercase();
            let lead = if context.is_empty() {
                phrase
            } else {
                format!("{phrase} {context}")
            };
            ConsequenceRecord::unconditional(format!(
                "{lead} applies if the related obligation is missed"
            ))
        })
        .collect()
}

/// `consequences`: codes resolved through the sentence table.
pub fn code_records(raw: &Value) -> Vec<ConsequenceRecord> {
    parse_items::<RawConsequence>(raw, "consequences")
        .into_iter()
        .map(|entry| {
            let mut record = entry.into_record();
            record.result = describe_consequence(&record.result).to_string();
            record
        })
        .collect()
}

/// `what_happens_if_you_dont_comply`: taken verbatim.
pub fn compliance_records(raw: &Value) -> Vec<ConsequenceRecord> {
    parse_items::<RawConsequence>(raw, "what_happens_if_you_dont_comply")
        .into_iter()
        .map(RawConsequence::into_record)
        .collect()
}

/// `consequence_chain`: condition/result pairs kept as they are.
pub fn chain_records(raw: &Value) -> Vec<ConsequenceRecord> {
    parse_items::<RawConsequence>(raw, "consequence_chain")
        .into_iter()
        .map(RawConsequence::into_record)
        .collect()
}

/// A consequence as it appears on the wire: a bare string or a record.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawConsequence {
    Flat(String),
    Structured {
        #[serde(default, deserialize_with = "de_option_string_forgiving")]
        condition: Option<String>,
        #[serde(default, deserialize_with = "de_option_string_forgiving")]
        result: Option<String>,
        #[serde(default, deserialize_with = "de_option_string_forgiving")]
        obligation_type: Option<String>,
    },
}

impl RawConsequence {
    fn into_record(self) -> ConsequenceRecord {
        match self {
            Self::Flat(text) => ConsequenceRecord::unconditional(text),
            Self::Structured {
                condition,
                result,
                obligation_type,
            } => ConsequenceRecord {
                condition: Condition::from_text(condition.as_deref().unwrap_or_default()),
                result: result.unwrap_or_default(),
                obligation_type,
            },
        }
    }
}

// ── Helpers ──

/// Deserialize each element of an array field, skipping elements that do
/// not fit. A missing or non-array field yields nothing.
fn parse_items<T: DeserializeOwned>(raw: &Value, field: &str) -> Vec<T> {
    let Some(items) = raw.get(field).and_then(Value::as_array) else {
        if raw.get(field).is_some_and(|v| !v.is_null()) {
            debug!(field, "must-know field is not an array, ignoring");
        }
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(field, error = %err, "skipping malformed must-know entry");
                None
            }
        })
        .collect()
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// `30.0` → `"30"`, `1.5` → `"1.5"`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
