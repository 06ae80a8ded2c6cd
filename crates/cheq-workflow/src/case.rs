//! # Case Records and Terminal Artifacts
//!
//! `Case` is the typed, run-local state the orchestrator threads through
//! the machine. Fields that an earlier step is responsible for are
//! `Option`s that start `None`; a later step can therefore never observe
//! a value its predecessor failed to populate.

use serde::{Deserialize, Serialize};

use cheq_audit::AuditTrail;
use cheq_core::{CaseId, ExtractedFields, ImagePayload, Timestamp};
use cheq_enrich::Verdict;

use crate::machine::CaseState;

/// Terminal decision of one run. Immutable once reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Cheque accepted for processing.
    Approve,
    /// Cheque rejected (account failed validation).
    Reject,
    /// Cheque routed to a human reviewer.
    ManualReview,
}

impl Decision {
    /// Canonical decision label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::ManualReview => "MANUAL_REVIEW",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one state-machine edge taken during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: String,
    /// State after the transition.
    pub to_state: String,
    /// When the transition occurred (UTC).
    pub at: Timestamp,
}

/// Derived booleans, each `None` until its owning step has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFlags {
    /// Whether the quality check judged the scan readable.
    pub is_readable: Option<bool>,
    /// Whether any fraud check flagged an anomaly.
    pub fraud_detected: Option<bool>,
    /// Whether the cheque date passed the date rules.
    pub is_date_valid: Option<bool>,
    /// Whether courtesy and legal amounts agree.
    pub is_amount_consistent: Option<bool>,
}

/// One document-processing run's accumulated state.
///
/// Owned exclusively by a single orchestrator run and discarded once the
/// [`CaseOutcome`] is produced.
#[derive(Debug)]
pub struct Case {
    /// Unique identifier for this run.
    pub id: CaseId,
    /// The scanned cheque image.
    pub image: ImagePayload,
    /// Typed field set; `None` until extraction succeeds.
    pub fields: Option<ExtractedFields>,
    /// Readability verdict from the quality check.
    pub quality_check: Option<Verdict>,
    /// Date verdict computed at extraction post-processing.
    pub date_check: Option<Verdict>,
    /// Amount-consistency verdict from the extraction pass.
    pub amount_check: Option<Verdict>,
    /// Account-validation verdict from the final step.
    pub account_check: Option<Verdict>,
    /// Derived booleans.
    pub flags: CaseFlags,
    /// User-facing feedback lines, in order.
    pub feedback: Vec<String>,
    pub(crate) transitions: Vec<TransitionRecord>,
}

impl Case {
    /// Open a fresh case for one image.
    pub fn new(image: ImagePayload) -> Self {
        Self {
            id: CaseId::new(),
            image,
            fields: None,
            quality_check: None,
            date_check: None,
            amount_check: None,
            account_check: None,
            flags: CaseFlags::default(),
            feedback: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Record one state-machine edge.
    pub fn record_transition(&mut self, from: CaseState, to: CaseState) {
        self.transitions.push(TransitionRecord {
            from_state: from.name().to_string(),
            to_state: to.name().to_string(),
            at: Timestamp::now(),
        });
    }

    /// The edges taken so far, in order.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }
}

/// Terminal artifact of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// The case this outcome belongs to.
    pub case_id: CaseId,
    /// Terminal decision.
    pub decision: Decision,
    /// User-facing feedback lines.
    pub feedback: Vec<String>,
    /// Report-safe view of the extracted fields, when extraction ran.
    pub extracted_fields: Option<serde_json::Value>,
    /// Formatted audit report (or its deterministic fallback).
    pub audit_summary: String,
    /// The full trail, for replay and downstream inspection.
    pub trail: AuditTrail,
    /// Every state-machine edge the run took, in order.
    pub transitions: Vec<TransitionRecord>,
}
