//! Terminal rendering of an analysis report.
//!
//! Layout follows the reading order of the report: overview, the must-know
//! summary, then one card per clause tagged with its presentation category.

use std::io::{self, Write};

use clariscan_core::{ClauseView, Deadline, MustKnowView, Percentage, PresentationCategory};
use clariscan_session::Displayed;

/// Clause text beyond this many characters is shortened unless `full` is set.
const MAX_CLAUSE_CHARS: usize = 280;

// ── Public API ──

/// Write a displayed analysis as a grouped, human-readable report.
pub fn write_report(out: &mut impl Write, displayed: &Displayed, full: bool) -> io::Result<()> {
    let report = &displayed.report;

    writeln!(out, "=== {} ===", displayed.file_name)?;
    write!(
        out,
        "Analyzed {}",
        displayed.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    if let Some(confidence) = report.confidence {
        write!(out, "  (confidence {})", format_confidence(confidence))?;
    }
    writeln!(out)?;
    writeln!(out)?;

    let overview = &report.overview;
    writeln!(out, "Risk Overview")?;
    writeln!(out, "  {:<26} {}", "overall", overview.overall.as_str())?;
    writeln!(out, "  {:<26} {}", "score", overview.score)?;
    writeln!(
        out,
        "  {:<26} {} / {} / {}",
        "high / medium / low", overview.high, overview.medium, overview.low
    )?;
    writeln!(out)?;

    if !report.must_know.is_empty() {
        writeln!(out, "What You Must Know")?;
        write_must_know(out, &report.must_know, "  ")?;
        writeln!(out)?;
    }

    if report.clauses.is_empty() {
        writeln!(out, "No flagged clauses.")?;
        writeln!(out)?;
    } else {
        writeln!(out, "Clauses ({})", report.clauses.len())?;
        for view in &report.clauses {
            write_clause(out, view, full)?;
        }
    }

    writeln!(out, "{}", report.disclaimer)?;
    Ok(())
}

/// Upper-case badge for a presentation category.
pub fn badge(category: PresentationCategory) -> &'static str {
    match category {
        PresentationCategory::Critical => "CRITICAL",
        PresentationCategory::Caution => "CAUTION",
        PresentationCategory::Safe => "SAFE",
    }
}

// ── Sections ──

fn write_must_know(out: &mut impl Write, view: &MustKnowView, indent: &str) -> io::Result<()> {
    if !view.deadlines.is_empty() {
        writeln!(out, "{indent}Deadlines")?;
        for deadline in &view.deadlines {
            writeln!(out, "{indent}  - {}", describe_deadline(deadline))?;
        }
    }
    if !view.percentages.is_empty() {
        writeln!(out, "{indent}Percentages")?;
        for percentage in &view.percentages {
            writeln!(out, "{indent}  - {}", describe_percentage(percentage))?;
        }
    }
    if !view.chain.is_empty() {
        writeln!(out, "{indent}If you miss an obligation")?;
        for (i, sentence) in view.chain.iter().enumerate() {
            writeln!(out, "{indent}  {}. {}", i + 1, sentence)?;
        }
    }
    Ok(())
}

fn write_clause(out: &mut impl Write, view: &ClauseView, full: bool) -> io::Result<()> {
    let analysis = &view.clause.analysis;
    let clause_type = if analysis.clause_type.is_empty() {
        "Clause"
    } else {
        analysis.clause_type.as_str()
    };

    writeln!(
        out,
        "  [{}] {} — {} Risk",
        badge(view.category),
        clause_type,
        analysis.risk_level.as_str()
    )?;
    let text = if full {
        view.clause.clause_text.clone()
    } else {
        shorten(&view.clause.clause_text, MAX_CLAUSE_CHARS)
    };
    if !text.is_empty() {
        writeln!(out, "    {text}")?;
    }
    if !analysis.explanation.is_empty() {
        writeln!(out, "    Explanation: {}", analysis.explanation)?;
    }
    if let Some(suggestion) = analysis.suggestion.as_deref().filter(|s| !s.is_empty()) {
        writeln!(out, "    Suggestion: {suggestion}")?;
    }
    if let Some(obligation) = analysis
        .obligation_explanation
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        writeln!(out, "    Obligation: {obligation}")?;
    }
    if let Some(must_know) = view.must_know.as_ref().filter(|m| !m.is_empty()) {
        write_must_know(out, must_know, "    ")?;
    }
    writeln!(out)
}

// ── Helpers ──

fn describe_deadline(deadline: &Deadline) -> String {
    let mut line = deadline.phrase();
    if line.is_empty() {
        line.push_str("(unspecified)");
    }
    if let Some(subject) = deadline.applies_to.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" ({subject})"));
    }
    if let Some(trigger) = deadline.trigger.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" after {trigger}"));
    }
    line
}

fn describe_percentage(percentage: &Percentage) -> String {
    let mut line = percentage.phrase();
    if !percentage.context.trim().is_empty() {
        line.push(' ');
        line.push_str(&percentage.context.trim().to_lowercase());
    }
    if let Some(frequency) = percentage.frequency.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(", {frequency}"));
    }
    if let Some(trigger) = percentage.trigger.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" when {trigger}"));
    }
    line
}

/// Confidence arrives either as a fraction or as a percentage.
fn format_confidence(confidence: f64) -> String {
    let percent = if confidence <= 1.0 {
        confidence * 100.0
    } else {
        confidence
    };
    format!("{percent:.0}%")
}

/// Cut to `max` characters, ending in "..." when shortened.
fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clariscan_core::{AnalysisResult, DISCLAIMER, DocumentUpload};
    use clariscan_session::{AnalysisLifecycle, LifecycleState};
    use serde_json::json;

    fn displayed(body: serde_json::Value) -> Displayed {
        let mut lifecycle = AnalysisLifecycle::new();
        lifecycle.select(DocumentUpload::new("lease.pdf", b"%PDF".to_vec()));
        let pending = lifecycle.begin_submit().unwrap();
        let result = AnalysisResult::from_value(&body).unwrap();
        lifecycle.complete(pending.generation, Ok::<_, std::io::Error>(result));
        match lifecycle.state() {
            LifecycleState::Displaying(displayed) => (**displayed).clone(),
            other => panic!("expected displaying, got {}", other.name()),
        }
    }

    fn render(displayed: &Displayed, full: bool) -> String {
        let mut out = Vec::new();
        write_report(&mut out, displayed, full).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn full_report_sections() {
        let shown = displayed(json!({
            "confidence": 0.87,
            "document_summary": {"user_must_know": {
                "deadlines": [{"value": 30, "unit": "days", "raw": "30 days", "applies_to": "payment"}],
                "percentages": [{"value": 1.5, "raw": "1.5%", "context": "Late Fee", "frequency": "monthly"}],
                "consequences": ["penalty"]
            }},
            "clauses": [{
                "clause_text": "1. The landlord may terminate at any time.",
                "analysis": {
                    "clause_type": "Termination",
                    "risk_level": "High",
                    "explanation": "One-sided termination.",
                    "suggestion": "Ask for a notice period."
                }
            }]
        }));
        let text = render(&shown, false);

        assert!(text.starts_with("=== lease.pdf ==="));
        assert!(text.contains("(confidence 87%)"));
        assert!(text.contains("What You Must Know"));
        assert!(text.contains("  - 30 days (payment)"));
        assert!(text.contains("  - 1.5% late fee, monthly"));
        assert!(text.contains("  1. missing 30 days"));
        assert!(text.contains("  3. Financial penalty may be charged"));
        assert!(text.contains("[CRITICAL] Termination — High Risk"));
        assert!(text.contains("Suggestion: Ask for a notice period."));
        assert!(text.trim_end().ends_with(DISCLAIMER));
    }

    #[test]
    fn empty_report_says_no_flagged_clauses() {
        let text = render(&displayed(json!({"clauses": []})), false);
        assert!(text.contains("No flagged clauses."));
        assert!(!text.contains("What You Must Know"));
    }

    #[test]
    fn long_clause_text_is_shortened_unless_full() {
        let long = "x".repeat(400);
        let shown = displayed(json!({
            "clauses": [{"clause_text": long, "analysis": {"risk_level": "Low"}}]
        }));
        assert!(render(&shown, false).contains(&format!("{}...", "x".repeat(277))));
        assert!(render(&shown, true).contains(&"x".repeat(400)));
    }

    #[test]
    fn badges() {
        assert_eq!(badge(PresentationCategory::Critical), "CRITICAL");
        assert_eq!(badge(PresentationCategory::Caution), "CAUTION");
        assert_eq!(badge(PresentationCategory::Safe), "SAFE");
    }

    #[test]
    fn shorten_respects_char_boundaries() {
        assert_eq!(shorten("short", 10), "short");
        assert_eq!(shorten("ééééééééééé", 8), "ééééé...");
    }

    #[test]
    fn confidence_formats() {
        assert_eq!(format_confidence(0.92), "92%");
        assert_eq!(format_confidence(75.0), "75%");
    }
}
