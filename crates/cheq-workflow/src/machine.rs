//! # The Case State Machine
//!
//! States are an enum; routing is the pure function [`next_state()`]
//! over `(state, Case)`. The machine is a strict DAG: forward edges
//! only, three terminal states, and terminals map to themselves so the
//! function stays total.

use serde::{Deserialize, Serialize};

use crate::case::{Case, Decision};

/// States of the case workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseState {
    /// Case opened, nothing has run yet.
    Start,
    /// Readability assessment of the scan.
    QualityCheck,
    /// Field extraction and validation.
    Extract,
    /// Fraud-signal collection and aggregation.
    FraudScan,
    /// Final account validation against the banking back end.
    ValidateAccount,
    /// Terminal: cheque accepted.
    Approved,
    /// Terminal: cheque rejected.
    Rejected,
    /// Terminal: routed to a human reviewer.
    ManualReview,
}

impl CaseState {
    /// Canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::QualityCheck => "QUALITY_CHECK",
            Self::Extract => "EXTRACT",
            Self::FraudScan => "FRAUD_SCAN",
            Self::ValidateAccount => "VALIDATE_ACCOUNT",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::ManualReview => "MANUAL_REVIEW",
        }
    }

    /// Whether this state ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::ManualReview)
    }

    /// The decision a terminal state carries; `None` for interior states.
    pub fn decision(&self) -> Option<Decision> {
        match self {
            Self::Approved => Some(Decision::Approve),
            Self::Rejected => Some(Decision::Reject),
            Self::ManualReview => Some(Decision::ManualReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pure transition function of the workflow.
///
/// Reads only the case fields the current state's step was responsible
/// for populating. Absent values route conservatively (toward
/// ManualReview or Rejected), never toward Approved.
pub fn next_state(state: CaseState, case: &Case) -> CaseState {
    match state {
        CaseState::Start => CaseState::QualityCheck,

        CaseState::QualityCheck => {
            if case.flags.is_readable == Some(true) {
                CaseState::Extract
            } else {
                CaseState::ManualReview
            }
        }

        CaseState::Extract => {
            if case.fields.is_some() {
                CaseState::FraudScan
            } else {
                CaseState::ManualReview
            }
        }

        CaseState::FraudScan => {
            if case.flags.fraud_detected == Some(false) {
                CaseState::ValidateAccount
            } else {
                CaseState::ManualReview
            }
        }

        CaseState::ValidateAccount => {
            let account_ok = case
                .account_check
                .as_ref()
                .map(|v| v.passed)
                .unwrap_or(false);
            if account_ok {
                CaseState::Approved
            } else {
                CaseState::Rejected
            }
        }

        terminal @ (CaseState::Approved | CaseState::Rejected | CaseState::ManualReview) => {
            terminal
        }
    }
}
