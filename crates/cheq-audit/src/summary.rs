//! # Summary Formatting
//!
//! Turning a trail into a human-readable report is a capability, not a
//! fixed routine: production deployments hand the ordered logs to an
//! external text-summarization service, while tests and the CLI use the
//! deterministic plain-text formatter here. Either way the workflow only
//! sees a string — formatter failures are absorbed by
//! [`AuditTrail::summarize()`](crate::AuditTrail::summarize).

use thiserror::Error;

use cheq_core::CaseId;

use crate::trail::{AnomalyEntry, AuditEntry};

/// Fallback report for a trail with no step logs.
pub const EMPTY_TRAIL_SUMMARY: &str = "No processing steps were logged.";

/// Fallback report when the formatter itself fails.
pub const SUMMARY_ERROR_PLACEHOLDER: &str =
    "Audit summary unavailable: report formatting failed.";

/// Error from a summary formatter backend.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The backing service was unreachable or returned garbage.
    #[error("formatter backend error: {0}")]
    Backend(String),
}

/// Capability interface for rendering an audit report.
///
/// Implementations must tolerate empty input and must not depend on any
/// per-run mutable state.
pub trait SummaryFormatter: Send + Sync {
    /// Format the ordered logs and anomalies of one case into a report.
    fn format(
        &self,
        case_id: &CaseId,
        logs: &[AuditEntry],
        anomalies: &[AnomalyEntry],
    ) -> Result<String, FormatError>;
}

/// Deterministic report formatter: header, numbered step lines, anomaly
/// section, one-line conclusion.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextFormatter;

impl SummaryFormatter for PlainTextFormatter {
    fn format(
        &self,
        case_id: &CaseId,
        logs: &[AuditEntry],
        anomalies: &[AnomalyEntry],
    ) -> Result<String, FormatError> {
        let mut out = String::new();
        out.push_str(&format!("Audit report for {case_id}\n"));

        out.push_str("Processing steps:\n");
        for (i, entry) in logs.iter().enumerate() {
            out.push_str(&format!("  {}. {entry}\n", i + 1));
        }

        out.push_str("Anomalies flagged:\n");
        if anomalies.is_empty() {
            out.push_str("  None\n");
        } else {
            for entry in anomalies {
                out.push_str(&format!("  - {entry}\n"));
            }
        }

        let conclusion = if anomalies.is_empty() {
            "Conclusion: no anomalies were flagged during processing."
        } else {
            "Conclusion: one or more anomalies were flagged; see above."
        };
        out.push_str(conclusion);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::{AuditTrail, StepStatus};

    /// Formatter that always fails, standing in for an unreachable service.
    struct BrokenFormatter;

    impl SummaryFormatter for BrokenFormatter {
        fn format(
            &self,
            _case_id: &CaseId,
            _logs: &[AuditEntry],
            _anomalies: &[AnomalyEntry],
        ) -> Result<String, FormatError> {
            Err(FormatError::Backend("service unreachable".to_string()))
        }
    }

    #[test]
    fn test_plain_formatter_lists_steps_in_order() {
        let mut t = AuditTrail::new(CaseId::new());
        t.log_step("Start", StepStatus::Success, "Image data received.");
        t.log_step("Image Quality Check", StepStatus::Success, "clear scan");
        let report = t.summarize(&PlainTextFormatter);
        let start_pos = report.find("Start").unwrap();
        let quality_pos = report.find("Image Quality Check").unwrap();
        assert!(start_pos < quality_pos);
    }

    #[test]
    fn test_plain_formatter_none_for_no_anomalies() {
        let mut t = AuditTrail::new(CaseId::new());
        t.log_step("Start", StepStatus::Success, "Image data received.");
        let report = t.summarize(&PlainTextFormatter);
        assert!(report.contains("None"));
        assert!(report.contains("no anomalies"));
    }

    #[test]
    fn test_plain_formatter_includes_anomalies() {
        let mut t = AuditTrail::new(CaseId::new());
        t.log_step("Start", StepStatus::Success, "Image data received.");
        t.highlight_anomaly("Date Validation", "Post-dated cheque (Date: 2027-01-01)");
        let report = t.summarize(&PlainTextFormatter);
        assert!(report.contains("Source: Date Validation"));
        assert!(report.contains("one or more anomalies"));
    }

    #[test]
    fn test_formatter_failure_degrades_to_placeholder() {
        let mut t = AuditTrail::new(CaseId::new());
        t.log_step("Start", StepStatus::Success, "Image data received.");
        assert_eq!(t.summarize(&BrokenFormatter), SUMMARY_ERROR_PLACEHOLDER);
    }

    #[test]
    fn test_plain_formatter_tolerates_empty_input() {
        let report = PlainTextFormatter
            .format(&CaseId::new(), &[], &[])
            .unwrap();
        assert!(report.contains("Anomalies flagged:"));
    }
}
