//! # The Case Orchestrator
//!
//! Owns one run: builds the `Case`, starts its `AuditTrail`, walks the
//! state machine executing one step per interior state, and returns the
//! terminal `CaseOutcome`. All delegated services arrive as injected
//! capabilities, so the orchestrator and its tests are independent of
//! what actually answers the calls.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use cheq_audit::{AuditTrail, StepStatus, SummaryFormatter};
use cheq_core::{validate_cheque_date, ImagePayload};
use cheq_enrich::{
    AccountValidator, BehaviorCheck, FieldExtractor, PayerDirectory, ReadabilityCheck,
    SignatureComparator, TamperingCheck, Verdict,
};
use cheq_fraud::{FraudAggregator, FraudChecks, FraudInput};

use crate::case::{Case, CaseOutcome, Decision};
use crate::machine::{next_state, CaseState};

/// Audit name of the intake step.
pub const START_STEP: &str = "Start";
/// Audit name of the quality-check step entry.
pub const QUALITY_STEP: &str = "Image Quality Check";
/// Anomaly source used when the quality check rejects a scan.
pub const QUALITY_ANOMALY: &str = "Image Quality";
/// Audit name of the extraction step.
pub const EXTRACT_STEP: &str = "Extraction & Validation";
/// Audit name of the account-validation step.
pub const ACCOUNT_STEP: &str = "Account Validation";

/// The full set of delegated capabilities one run needs.
///
/// Shared handles so a suite can serve many concurrent orchestrators;
/// every capability is `Send + Sync` by trait bound.
pub struct EnrichmentSuite {
    /// Image readability assessment.
    pub readability: Arc<dyn ReadabilityCheck>,
    /// Field extraction.
    pub extractor: Arc<dyn FieldExtractor>,
    /// Tampering inspection.
    pub tampering: Arc<dyn TamperingCheck>,
    /// Behavioral analysis.
    pub behavior: Arc<dyn BehaviorCheck>,
    /// Signature comparison.
    pub signatures: Arc<dyn SignatureComparator>,
    /// Account validation.
    pub accounts: Arc<dyn AccountValidator>,
}

/// The workflow engine for one kind of case; reusable across runs.
pub struct CaseOrchestrator {
    suite: EnrichmentSuite,
    directory: Arc<dyn PayerDirectory>,
    formatter: Box<dyn SummaryFormatter>,
    reference_date: Option<NaiveDate>,
}

impl CaseOrchestrator {
    /// Build an orchestrator over the given capabilities.
    pub fn new(
        suite: EnrichmentSuite,
        directory: Arc<dyn PayerDirectory>,
        formatter: Box<dyn SummaryFormatter>,
    ) -> Self {
        Self {
            suite,
            directory,
            formatter,
            reference_date: None,
        }
    }

    /// Pin the date-rule reference date (tests; replay of historical
    /// batches). Unpinned orchestrators use today's UTC date.
    pub fn with_reference_date(mut self, reference: NaiveDate) -> Self {
        self.reference_date = Some(reference);
        self
    }

    /// Drive one image to a terminal decision. Infallible: every failure
    /// mode resolves into the decision and the trail.
    pub fn run(&self, image: ImagePayload) -> CaseOutcome {
        let mut case = Case::new(image);
        let mut trail = AuditTrail::new(case.id);
        let mut state = CaseState::Start;

        while !state.is_terminal() {
            self.execute(state, &mut case, &mut trail);
            let next = next_state(state, &case);
            tracing::debug!(case = %case.id, from = state.name(), to = next.name(), "transition");
            case.record_transition(state, next);
            state = next;
        }

        // Terminal states always carry a decision; the fallback is the
        // conservative route and cannot be reached from this loop.
        let decision = state.decision().unwrap_or(Decision::ManualReview);
        let audit_summary = trail.summarize(self.formatter.as_ref());

        CaseOutcome {
            case_id: case.id,
            decision,
            feedback: case.feedback,
            extracted_fields: case.fields.as_ref().map(|f| f.to_report_json()),
            audit_summary,
            trail,
            transitions: case.transitions,
        }
    }

    fn execute(&self, state: CaseState, case: &mut Case, trail: &mut AuditTrail) {
        match state {
            CaseState::Start => self.step_start(case, trail),
            CaseState::QualityCheck => self.step_quality(case, trail),
            CaseState::Extract => self.step_extract(case, trail),
            CaseState::FraudScan => self.step_fraud_scan(case, trail),
            CaseState::ValidateAccount => self.step_validate_account(case, trail),
            CaseState::Approved | CaseState::Rejected | CaseState::ManualReview => {}
        }
    }

    fn step_start(&self, case: &mut Case, trail: &mut AuditTrail) {
        trail.log_step(
            START_STEP,
            StepStatus::Success,
            &format!("Image data received ({}).", case.image.digest()),
        );
    }

    fn step_quality(&self, case: &mut Case, trail: &mut AuditTrail) {
        let verdict = Verdict::or_conservative(
            self.suite.readability.assess(&case.image),
            QUALITY_ANOMALY,
        );
        if verdict.passed {
            trail.log_step(QUALITY_STEP, StepStatus::Success, &verdict.reason);
        } else {
            trail.highlight_anomaly(QUALITY_ANOMALY, &verdict.reason);
        }
        case.flags.is_readable = Some(verdict.passed);
        case.quality_check = Some(verdict);
    }

    fn step_extract(&self, case: &mut Case, trail: &mut AuditTrail) {
        match self.suite.extractor.extract(&case.image) {
            Ok(extraction) => {
                let assessment =
                    validate_cheque_date(&extraction.fields.date_raw, self.reference_date());
                let date_check = Verdict {
                    passed: assessment.valid,
                    reason: assessment.reason,
                    extra: None,
                };

                case.flags.is_date_valid = Some(date_check.passed);
                case.flags.is_amount_consistent = Some(extraction.amount_check.passed);
                case.date_check = Some(date_check);
                case.amount_check = Some(extraction.amount_check);
                case.fields = Some(extraction.fields);

                trail.log_step(
                    EXTRACT_STEP,
                    StepStatus::Success,
                    "Data extracted and validated.",
                );
            }
            Err(e) => {
                trail.log_step(EXTRACT_STEP, StepStatus::Failed, &e.to_string());
            }
        }
    }

    fn step_fraud_scan(&self, case: &mut Case, trail: &mut AuditTrail) {
        // The machine only enters FraudScan after a successful
        // extraction, so these are always populated.
        let (Some(fields), Some(date_check), Some(amount_check)) =
            (&case.fields, &case.date_check, &case.amount_check)
        else {
            case.flags.fraud_detected = Some(true);
            return;
        };

        let aggregator = FraudAggregator::new(
            FraudChecks {
                tampering: self.suite.tampering.as_ref(),
                behavior: self.suite.behavior.as_ref(),
                signatures: self.suite.signatures.as_ref(),
            },
            self.directory.as_ref(),
        );
        let report = aggregator.run(
            FraudInput {
                image: &case.image,
                fields,
                date_check,
                amount_check,
            },
            trail,
        );
        case.flags.fraud_detected = Some(report.fraud_detected);
    }

    fn step_validate_account(&self, case: &mut Case, trail: &mut AuditTrail) {
        // Same invariant: ValidateAccount is only reachable with fields.
        let Some(fields) = &case.fields else {
            return;
        };

        let verdict = Verdict::or_conservative(
            self.suite.accounts.validate(&fields.account_number),
            ACCOUNT_STEP,
        );
        if verdict.passed {
            trail.log_step(ACCOUNT_STEP, StepStatus::Success, &verdict.reason);
            case.feedback.push("Cheque processed successfully.".to_string());
        } else {
            trail.highlight_anomaly(ACCOUNT_STEP, &verdict.reason);
        }
        case.account_check = Some(verdict);
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}
