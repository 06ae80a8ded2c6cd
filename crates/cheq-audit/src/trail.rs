//! # The Audit Trail
//!
//! Append-only record of step outcomes and flagged anomalies for one
//! case. Owned by a single orchestrator run; nothing here is shared
//! across cases.

use serde::{Deserialize, Serialize};

use cheq_core::{CaseId, Timestamp};

use crate::summary::{SummaryFormatter, EMPTY_TRAIL_SUMMARY, SUMMARY_ERROR_PLACEHOLDER};

/// Status of a logged workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    /// The step ran and its expectation held.
    Success,
    /// The step ran and could not produce its result.
    Failed,
    /// The step ran to completion as a summary marker (used by the fraud
    /// aggregation wrap-up entry, which is neither a pass nor a failure).
    Completed,
}

impl StepStatus {
    /// Canonical status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step-log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the trail-wide insertion order (shared with anomalies).
    pub seq: u64,
    /// Step name, e.g. `"Image Quality Check"`.
    pub step: String,
    /// Outcome status.
    pub status: StepStatus,
    /// Free-text summary of what the step observed.
    pub summary: String,
    /// When the entry was appended (UTC).
    pub at: Timestamp,
}

impl std::fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Step: {}, Status: {}, Summary: {}",
            self.step, self.status, self.summary
        )
    }
}

/// One flagged anomaly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyEntry {
    /// Position in the trail-wide insertion order (shared with step logs).
    pub seq: u64,
    /// The check that raised the anomaly, e.g. `"Date Validation"`.
    pub source: String,
    /// What deviated from expectation.
    pub details: String,
    /// When the entry was appended (UTC).
    pub at: Timestamp,
}

impl std::fmt::Display for AnomalyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Source: {}, Details: {}", self.source, self.details)
    }
}

/// Verdict derived from the trail for a named check.
///
/// `flagged` is true when the authoritative (most recent) matching entry
/// is an anomaly or a `Failed` step log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailVerdict {
    /// Whether the check is flagged as deviating.
    pub flagged: bool,
    /// The summary or details of the authoritative entry.
    pub reason: String,
}

/// Append-only log of step outcomes and anomalies for one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    case_id: CaseId,
    next_seq: u64,
    logs: Vec<AuditEntry>,
    anomalies: Vec<AnomalyEntry>,
}

impl AuditTrail {
    /// Start an empty trail for one case.
    pub fn new(case_id: CaseId) -> Self {
        tracing::info!(case = %case_id, "started audit trail");
        Self {
            case_id,
            next_seq: 0,
            logs: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    /// The case this trail belongs to.
    pub fn case_id(&self) -> CaseId {
        self.case_id
    }

    /// Append a step-log entry. Never fails.
    pub fn log_step(&mut self, step: &str, status: StepStatus, summary: &str) {
        let entry = AuditEntry {
            seq: self.take_seq(),
            step: step.to_string(),
            status,
            summary: summary.to_string(),
            at: Timestamp::now(),
        };
        tracing::info!(case = %self.case_id, "{entry}");
        self.logs.push(entry);
    }

    /// Append an anomaly highlight. Never fails, never touches step logs.
    pub fn highlight_anomaly(&mut self, source: &str, details: &str) {
        let entry = AnomalyEntry {
            seq: self.take_seq(),
            source: source.to_string(),
            details: details.to_string(),
            at: Timestamp::now(),
        };
        tracing::warn!(case = %self.case_id, "ANOMALY DETECTED: {entry}");
        self.anomalies.push(entry);
    }

    /// Step logs in insertion order.
    pub fn logs(&self) -> &[AuditEntry] {
        &self.logs
    }

    /// Anomaly highlights in insertion order.
    pub fn anomalies(&self) -> &[AnomalyEntry] {
        &self.anomalies
    }

    /// Whether nothing has been logged at all.
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() && self.anomalies.is_empty()
    }

    /// Derive a single verdict for a named check from the trail.
    ///
    /// Searches both sequences from the end; the matching entry with the
    /// highest sequence number wins. Matching is by substring so callers
    /// can ask for `"Signature Verification"` and hit entries logged under
    /// that exact name.
    pub fn verdict_for(&self, check_name: &str) -> Option<TrailVerdict> {
        let latest_log = self
            .logs
            .iter()
            .rev()
            .find(|entry| entry.step.contains(check_name));
        let latest_anomaly = self
            .anomalies
            .iter()
            .rev()
            .find(|entry| entry.source.contains(check_name));

        match (latest_log, latest_anomaly) {
            (None, None) => None,
            (Some(log), None) => Some(verdict_from_log(log)),
            (None, Some(anomaly)) => Some(verdict_from_anomaly(anomaly)),
            (Some(log), Some(anomaly)) => {
                if log.seq > anomaly.seq {
                    Some(verdict_from_log(log))
                } else {
                    Some(verdict_from_anomaly(anomaly))
                }
            }
        }
    }

    /// Format the trail into a report. Never fails.
    ///
    /// An empty trail and a formatter error both produce fixed fallback
    /// strings instead of propagating the problem.
    pub fn summarize(&self, formatter: &dyn SummaryFormatter) -> String {
        if self.logs.is_empty() {
            return EMPTY_TRAIL_SUMMARY.to_string();
        }
        match formatter.format(&self.case_id, &self.logs, &self.anomalies) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(case = %self.case_id, "summary formatter failed: {e}");
                SUMMARY_ERROR_PLACEHOLDER.to_string()
            }
        }
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

fn verdict_from_log(entry: &AuditEntry) -> TrailVerdict {
    TrailVerdict {
        flagged: entry.status == StepStatus::Failed,
        reason: entry.summary.clone(),
    }
}

fn verdict_from_anomaly(entry: &AnomalyEntry) -> TrailVerdict {
    TrailVerdict {
        flagged: true,
        reason: entry.details.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::PlainTextFormatter;

    fn trail() -> AuditTrail {
        AuditTrail::new(CaseId::new())
    }

    // ── Ordering ─────────────────────────────────────────────────────

    #[test]
    fn test_logs_keep_insertion_order() {
        let mut t = trail();
        t.log_step("Start", StepStatus::Success, "Image data received.");
        t.log_step("Image Quality Check", StepStatus::Success, "ok");
        t.log_step("Extraction & Validation", StepStatus::Success, "ok");
        let steps: Vec<_> = t.logs().iter().map(|e| e.step.as_str()).collect();
        assert_eq!(
            steps,
            ["Start", "Image Quality Check", "Extraction & Validation"]
        );
    }

    #[test]
    fn test_seq_is_monotonic_across_both_sequences() {
        let mut t = trail();
        t.log_step("Start", StepStatus::Success, "a");
        t.highlight_anomaly("Date Validation", "b");
        t.log_step("Fraud Detection", StepStatus::Completed, "c");
        t.highlight_anomaly("Account Validation", "d");

        assert_eq!(t.logs()[0].seq, 0);
        assert_eq!(t.anomalies()[0].seq, 1);
        assert_eq!(t.logs()[1].seq, 2);
        assert_eq!(t.anomalies()[1].seq, 3);
    }

    #[test]
    fn test_anomaly_does_not_alter_step_logs() {
        let mut t = trail();
        t.log_step("Signature Verification", StepStatus::Success, "match");
        let before = t.logs().len();
        t.highlight_anomaly("Signature Verification", "mismatch on retry");
        assert_eq!(t.logs().len(), before);
        assert_eq!(t.logs()[0].summary, "match");
    }

    // ── Trail-derived verdicts ───────────────────────────────────────

    #[test]
    fn test_verdict_for_unknown_check_is_none() {
        let t = trail();
        assert!(t.verdict_for("Signature Verification").is_none());
    }

    #[test]
    fn test_verdict_for_success_entry() {
        let mut t = trail();
        t.log_step("Signature Verification", StepStatus::Success, "Strokes match.");
        let v = t.verdict_for("Signature Verification").unwrap();
        assert!(!v.flagged);
        assert_eq!(v.reason, "Strokes match.");
    }

    #[test]
    fn test_verdict_for_prefers_most_recent_entry() {
        let mut t = trail();
        t.log_step("Signature Verification", StepStatus::Success, "first pass");
        t.highlight_anomaly("Signature Verification", "second look disagreed");
        let v = t.verdict_for("Signature Verification").unwrap();
        assert!(v.flagged);
        assert_eq!(v.reason, "second look disagreed");
    }

    #[test]
    fn test_verdict_for_log_after_anomaly_wins() {
        let mut t = trail();
        t.highlight_anomaly("Signature Verification", "early doubt");
        t.log_step("Signature Verification", StepStatus::Success, "resolved");
        let v = t.verdict_for("Signature Verification").unwrap();
        assert!(!v.flagged);
        assert_eq!(v.reason, "resolved");
    }

    #[test]
    fn test_verdict_for_failed_step_is_flagged() {
        let mut t = trail();
        t.log_step("Extraction & Validation", StepStatus::Failed, "no fields");
        let v = t.verdict_for("Extraction & Validation").unwrap();
        assert!(v.flagged);
    }

    // ── Summaries ────────────────────────────────────────────────────

    #[test]
    fn test_empty_trail_summary_fallback() {
        let t = trail();
        assert_eq!(t.summarize(&PlainTextFormatter), EMPTY_TRAIL_SUMMARY);
    }

    #[test]
    fn test_summarize_with_plain_formatter() {
        let mut t = trail();
        t.log_step("Start", StepStatus::Success, "Image data received.");
        let report = t.summarize(&PlainTextFormatter);
        assert!(report.contains("Start"));
        assert!(report.contains(&t.case_id().short()));
    }

    // ── Serialization ────────────────────────────────────────────────

    #[test]
    fn test_trail_serde_roundtrip() {
        let mut t = trail();
        t.log_step("Start", StepStatus::Success, "Image data received.");
        t.highlight_anomaly("Image Quality", "too dark");
        let json = serde_json::to_string(&t).unwrap();
        let parsed: AuditTrail = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.logs().len(), 1);
        assert_eq!(parsed.anomalies().len(), 1);
        assert_eq!(parsed.case_id(), t.case_id());
    }

    #[test]
    fn test_status_serde_labels() {
        let json = serde_json::to_string(&StepStatus::Completed).unwrap();
        assert_eq!(json, "\"Completed\"");
    }
}
