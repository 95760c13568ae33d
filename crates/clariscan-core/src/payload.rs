//! Intake of the analysis service's response body.
//!
//! Only two things make a body unusable: it is not JSON, or it is not a JSON
//! object. Everything below the top level is read best-effort.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::must_know::{ConsequenceNarrative, normalize};
use crate::risk::RiskLevel;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response is not a JSON object")]
    NotAnObject,
}

/// The service's verdict on whether the upload is a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentClass {
    #[default]
    Contract,
    NonContract,
}

impl DocumentClass {
    /// Only `"non_contract"` marks a non-contract; absence or anything else
    /// reads as a contract.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str).map(str::trim) {
            Some("non_contract") => Self::NonContract,
            _ => Self::Contract,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::NonContract => "non_contract",
        }
    }
}

/// Per-clause analysis from the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClauseAnalysis {
    pub clause_type: String,
    pub risk_level: RiskLevel,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obligation_explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_know: Option<ConsequenceNarrative>,
}

/// A span of contract text with its analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Clause {
    pub clause_text: String,
    pub analysis: ClauseAnalysis,
}

/// A parsed service response. Replaced wholesale on every submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisResult {
    pub document_type: DocumentClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub must_know: ConsequenceNarrative,
    pub clauses: Vec<Clause>,
}

impl AnalysisResult {
    /// Parse a raw response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(&value)
    }

    /// Read a response already decoded to JSON.
    ///
    /// Accepts both the current shape (`document_summary.user_must_know` +
    /// `clauses`) and the legacy shape (top-level `results`, no summary).
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let object = value.as_object().ok_or(PayloadError::NotAnObject)?;

        let must_know = object
            .get("document_summary")
            .and_then(|summary| summary.get("user_must_know"))
            .map(normalize)
            .unwrap_or_default();

        let clause_items = object
            .get("clauses")
            .and_then(Value::as_array)
            .or_else(|| object.get("results").and_then(Value::as_array));
        let clauses: Vec<Clause> = clause_items
            .map(|items| items.iter().filter_map(parse_clause).collect())
            .unwrap_or_default();

        Ok(Self {
            document_type: DocumentClass::from_value(object.get("document_type")),
            confidence: object.get("confidence").and_then(Value::as_f64),
            message: string_field(object, "message"),
            must_know,
            clauses,
        })
    }

    /// The clauses' risk levels in document order.
    pub fn risk_levels(&self) -> impl Iterator<Item = RiskLevel> + '_ {
        self.clauses.iter().map(|clause| clause.analysis.risk_level)
    }
}

fn parse_clause(item: &Value) -> Option<Clause> {
    let Some(object) = item.as_object() else {
        debug!("skipping clause entry that is not an object");
        return None;
    };
    let analysis = object
        .get("analysis")
        .and_then(Value::as_object)
        .map(parse_clause_analysis)
        .unwrap_or_default();
    Some(Clause {
        clause_text: string_field(object, "clause_text").unwrap_or_default(),
        analysis,
    })
}

fn parse_clause_analysis(object: &Map<String, Value>) -> ClauseAnalysis {
    ClauseAnalysis {
        clause_type: string_field(object, "clause_type").unwrap_or_default(),
        risk_level: object
            .get("risk_level")
            .map(RiskLevel::from_value)
            .unwrap_or_default(),
        explanation: string_field(object, "explanation").unwrap_or_default(),
        suggestion: string_field(object, "suggestion"),
        obligation_explanation: string_field(object, "obligation_explanation"),
        must_know: object
            .get("user_must_know")
            .filter(|v| v.is_object())
            .map(normalize),
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}
