//! Document gate: only contracts get their results displayed.

use tracing::info;

use crate::payload::{AnalysisResult, DocumentClass};

/// Shown when the service rejects a document without saying why.
pub const DEFAULT_REJECTION: &str = "This document does not appear to be a contract.";

/// Outcome of passing a result through the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Admitted(AnalysisResult),
    /// The result is dropped; only the message survives.
    Rejected(String),
}

/// Admit contracts unchanged, reject non-contracts with the service's
/// message (or [`DEFAULT_REJECTION`] when it is absent or blank).
pub fn admit(result: AnalysisResult) -> GateDecision {
    match result.document_type {
        DocumentClass::Contract => GateDecision::Admitted(result),
        DocumentClass::NonContract => {
            let message = result
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
            info!(message = %message, "document rejected as non-contract");
            GateDecision::Rejected(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> AnalysisResult {
        AnalysisResult::from_value(&value).unwrap()
    }

    #[test]
    fn contract_admitted_unchanged() {
        let result = parse(json!({
            "document_type": "contract",
            "clauses": [{"clause_text": "1. Term", "analysis": {"risk_level": "High"}}]
        }));
        assert_eq!(admit(result.clone()), GateDecision::Admitted(result));
    }

    #[test]
    fn missing_document_type_admitted() {
        let result = parse(json!({"results": []}));
        assert!(matches!(admit(result), GateDecision::Admitted(_)));
    }

    #[test]
    fn non_contract_uses_service_message() {
        let result = parse(json!({
            "document_type": "non_contract",
            "message": "Not a contract",
            "clauses": [{"clause_text": "Dear diary", "analysis": {}}]
        }));
        assert_eq!(admit(result), GateDecision::Rejected("Not a contract".into()));
    }

    #[test]
    fn non_contract_default_message() {
        let result = parse(json!({"document_type": "non_contract"}));
        assert_eq!(admit(result), GateDecision::Rejected(DEFAULT_REJECTION.into()));

        let blank = parse(json!({"document_type": "non_contract", "message": "  "}));
        assert_eq!(admit(blank), GateDecision::Rejected(DEFAULT_REJECTION.into()));
    }
}
