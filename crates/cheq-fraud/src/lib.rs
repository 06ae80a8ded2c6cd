//! # cheq-fraud — Fraud-Signal Aggregation
//!
//! Runs the five fraud-relevant checks against an extracted cheque in a
//! fixed order, records every outcome in the audit trail, and ORs the
//! individual signals into one `fraud_detected` flag.
//!
//! ## No Short-Circuiting
//!
//! Every check always runs and is always logged, even after an earlier
//! check has flagged fraud. A reviewer reading the trail of a flagged
//! cheque sees the complete picture, not just the first hit.
//!
//! ## Check Order
//!
//! 1. Date validation (computed at extraction, consumed here)
//! 2. Amount consistency (delegated, rides along with extraction)
//! 3. Tampering detection (delegated)
//! 4. Behavioral analysis (delegated, requires payer lookup)
//! 5. Signature verification (delegated, requires signature region,
//!    payer record, and reference asset)
//!
//! Directory misses are anomalies in their own right, never silent
//! skips; service failures resolve to flagged signals through the
//! conservative-failure contract.

use serde::{Deserialize, Serialize};

use cheq_audit::{AuditTrail, StepStatus};
use cheq_core::{ExtractedFields, ImagePayload};
use cheq_enrich::{
    BehaviorCheck, PayerDirectory, SignatureComparator, TamperingCheck, Verdict,
};

/// Audit name of the date check.
pub const DATE_CHECK: &str = "Date Validation";
/// Audit name of the amount-consistency check.
pub const AMOUNT_CHECK: &str = "Amount Verification";
/// Audit name of the tampering check.
pub const TAMPERING_CHECK: &str = "Tampering Detection";
/// Audit name of the behavioral check.
pub const BEHAVIOR_CHECK: &str = "Behavior Analysis";
/// Audit name of the signature check.
pub const SIGNATURE_CHECK: &str = "Signature Verification";
/// Audit name of the aggregation summary entry.
pub const SUMMARY_STEP: &str = "Fraud Detection";

/// One check's contribution to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalySignal {
    /// Which check produced the signal.
    pub source: String,
    /// Whether the check flagged an anomaly.
    pub flagged: bool,
    /// The check's justification.
    pub reason: String,
}

/// Aggregate outcome of the fraud scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudReport {
    /// OR across all signals.
    pub fraud_detected: bool,
    /// Every check's signal, in execution order.
    pub signals: Vec<AnomalySignal>,
}

/// The delegated checks the aggregator drives.
pub struct FraudChecks<'a> {
    /// Visual-alteration inspection.
    pub tampering: &'a dyn TamperingCheck,
    /// Historical-behavior analysis.
    pub behavior: &'a dyn BehaviorCheck,
    /// Signature comparison.
    pub signatures: &'a dyn SignatureComparator,
}

/// Inputs the aggregator consumes; all produced by earlier workflow steps.
pub struct FraudInput<'a> {
    /// The full cheque image.
    pub image: &'a ImagePayload,
    /// The typed field set from extraction.
    pub fields: &'a ExtractedFields,
    /// Date verdict computed at extraction post-processing.
    pub date_check: &'a Verdict,
    /// Amount-consistency verdict from the extraction pass.
    pub amount_check: &'a Verdict,
}

/// Runs the fraud-relevant checks and aggregates their signals.
pub struct FraudAggregator<'a> {
    checks: FraudChecks<'a>,
    directory: &'a dyn PayerDirectory,
}

impl<'a> FraudAggregator<'a> {
    /// Build an aggregator over the given checks and payer directory.
    pub fn new(checks: FraudChecks<'a>, directory: &'a dyn PayerDirectory) -> Self {
        Self { checks, directory }
    }

    /// Execute all five checks in order, logging each outcome, and
    /// return the aggregate. Always logs the summary entry last.
    pub fn run(&self, input: FraudInput<'_>, trail: &mut AuditTrail) -> FraudReport {
        let mut signals = Vec::with_capacity(5);

        record(trail, &mut signals, DATE_CHECK, input.date_check.clone());
        record(trail, &mut signals, AMOUNT_CHECK, input.amount_check.clone());

        let tampering = Verdict::or_conservative(
            self.checks.tampering.inspect(input.image),
            TAMPERING_CHECK,
        );
        record(trail, &mut signals, TAMPERING_CHECK, tampering);

        let behavior = self.behavior_verdict(input.fields);
        record(trail, &mut signals, BEHAVIOR_CHECK, behavior);

        let signature = self.signature_verdict(input.fields);
        record(trail, &mut signals, SIGNATURE_CHECK, signature);

        let fraud_detected = signals.iter().any(|s| s.flagged);
        trail.log_step(
            SUMMARY_STEP,
            StepStatus::Completed,
            &format!("Fraud found: {fraud_detected}"),
        );

        FraudReport {
            fraud_detected,
            signals,
        }
    }

    fn behavior_verdict(&self, fields: &ExtractedFields) -> Verdict {
        match self.directory.lookup(&fields.account_number) {
            None => Verdict::fail(format!(
                "Account number '{}' not found in payer database.",
                fields.account_number
            )),
            Some(payer) => Verdict::or_conservative(
                self.checks.behavior.analyze(fields, &payer),
                BEHAVIOR_CHECK,
            ),
        }
    }

    fn signature_verdict(&self, fields: &ExtractedFields) -> Verdict {
        let Some(region) = &fields.signature_region else {
            return Verdict::fail("No signature region was extracted from the cheque.");
        };

        let Some(payer) = self.directory.lookup(&fields.account_number) else {
            return Verdict::fail(format!(
                "Payer account '{}' not found in database.",
                fields.account_number
            ));
        };

        match self.directory.reference_signature(&payer) {
            Err(e) => Verdict::fail(format!("Error during comparison: {e}")),
            Ok(reference) => Verdict::or_conservative(
                self.checks.signatures.compare(region, &reference),
                SIGNATURE_CHECK,
            ),
        }
    }
}

/// Log one check's verdict and keep its signal.
fn record(trail: &mut AuditTrail, signals: &mut Vec<AnomalySignal>, source: &str, verdict: Verdict) {
    if verdict.passed {
        trail.log_step(source, StepStatus::Success, &verdict.reason);
    } else {
        trail.highlight_anomaly(source, &verdict.reason);
    }
    signals.push(AnomalySignal {
        source: source.to_string(),
        flagged: !verdict.passed,
        reason: verdict.reason,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use cheq_core::{AccountNumber, CaseId};
    use cheq_enrich::mock::{
        MockBehavior, MockPayerDirectory, MockSignatures, MockTampering, UnreachableService,
    };

    const KNOWN_ACCOUNT: &str = "12345678";
    const UNKNOWN_ACCOUNT: &str = "99990000";

    fn fields_for(account: &str, with_signature: bool) -> ExtractedFields {
        ExtractedFields {
            payee: "Utility Company".to_string(),
            amount: 150.25,
            amount_in_words: Some("ONE HUNDRED FIFTY & 25/100".to_string()),
            date_raw: "010124".to_string(),
            account_number: AccountNumber::new(account).unwrap(),
            signature_region: with_signature.then(|| ImagePayload::new(vec![0xAB; 32])),
            metadata: BTreeMap::new(),
        }
    }

    fn known_directory() -> MockPayerDirectory {
        MockPayerDirectory::empty().with_payer(
            &AccountNumber::new(KNOWN_ACCOUNT).unwrap(),
            "Apple Tan",
            "reference_signature.png",
        )
    }

    fn run_with(
        tampering: &MockTampering,
        behavior: &MockBehavior,
        signatures: &MockSignatures,
        directory: &MockPayerDirectory,
        fields: &ExtractedFields,
        date_check: Verdict,
        amount_check: Verdict,
    ) -> (FraudReport, AuditTrail) {
        let mut trail = AuditTrail::new(CaseId::new());
        let aggregator = FraudAggregator::new(
            FraudChecks {
                tampering,
                behavior,
                signatures,
            },
            directory,
        );
        let image = ImagePayload::new(vec![1, 2, 3]);
        let report = aggregator.run(
            FraudInput {
                image: &image,
                fields,
                date_check: &date_check,
                amount_check: &amount_check,
            },
            &mut trail,
        );
        (report, trail)
    }

    // ── Clean run ────────────────────────────────────────────────────

    #[test]
    fn test_all_checks_pass_no_fraud() {
        let tampering = MockTampering::clean();
        let behavior = MockBehavior::normal();
        let signatures = MockSignatures::matching();
        let directory = known_directory();
        let fields = fields_for(KNOWN_ACCOUNT, true);

        let (report, trail) = run_with(
            &tampering,
            &behavior,
            &signatures,
            &directory,
            &fields,
            Verdict::pass("Date is valid"),
            Verdict::pass("Amounts are consistent."),
        );

        assert!(!report.fraud_detected);
        assert_eq!(report.signals.len(), 5);
        assert!(report.signals.iter().all(|s| !s.flagged));
        assert!(trail.anomalies().is_empty());
        // Summary entry is always last.
        let last = trail.logs().last().unwrap();
        assert_eq!(last.step, SUMMARY_STEP);
        assert_eq!(last.summary, "Fraud found: false");
    }

    #[test]
    fn test_signal_order_is_fixed() {
        let tampering = MockTampering::clean();
        let behavior = MockBehavior::normal();
        let signatures = MockSignatures::matching();
        let directory = known_directory();
        let fields = fields_for(KNOWN_ACCOUNT, true);

        let (report, _) = run_with(
            &tampering,
            &behavior,
            &signatures,
            &directory,
            &fields,
            Verdict::pass("Date is valid"),
            Verdict::pass("ok"),
        );

        let order: Vec<_> = report.signals.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(
            order,
            [
                DATE_CHECK,
                AMOUNT_CHECK,
                TAMPERING_CHECK,
                BEHAVIOR_CHECK,
                SIGNATURE_CHECK
            ]
        );
    }

    // ── OR semantics, no short-circuit ───────────────────────────────

    #[test]
    fn test_one_flagged_check_sets_fraud_but_all_still_run() {
        let tampering = MockTampering::clean();
        let behavior = MockBehavior::normal();
        let signatures = MockSignatures::matching();
        let directory = known_directory();
        let fields = fields_for(KNOWN_ACCOUNT, true);

        let (report, trail) = run_with(
            &tampering,
            &behavior,
            &signatures,
            &directory,
            &fields,
            Verdict::fail("Post-dated cheque (Date: 2027-01-01)"),
            Verdict::pass("ok"),
        );

        assert!(report.fraud_detected);
        assert_eq!(report.signals.len(), 5);
        // The later delegated checks all still executed.
        assert_eq!(tampering.call_count(), 1);
        assert_eq!(behavior.call_count(), 1);
        assert_eq!(signatures.call_count(), 1);
        assert_eq!(trail.anomalies().len(), 1);
        assert_eq!(trail.anomalies()[0].source, DATE_CHECK);
    }

    #[test]
    fn test_every_flagged_check_is_its_own_anomaly() {
        let tampering = MockTampering::flagging("font mismatch in amount field");
        let behavior = MockBehavior::anomalous("Amount far exceeds historical maximum.");
        let signatures = MockSignatures::mismatching("slant differs");
        let directory = known_directory();
        let fields = fields_for(KNOWN_ACCOUNT, true);

        let (report, trail) = run_with(
            &tampering,
            &behavior,
            &signatures,
            &directory,
            &fields,
            Verdict::fail("Stale-dated cheque (Date is older than 180 days)"),
            Verdict::fail("Amounts 150.25 and 'TEN DOLLARS' are not consistent."),
        );

        assert!(report.fraud_detected);
        assert!(report.signals.iter().all(|s| s.flagged));
        assert_eq!(trail.anomalies().len(), 5);
        assert!(trail.logs().iter().any(|e| e.step == SUMMARY_STEP));
    }

    // ── Directory misses ─────────────────────────────────────────────

    #[test]
    fn test_unknown_account_flags_behavior_and_signature() {
        let tampering = MockTampering::clean();
        let behavior = MockBehavior::normal();
        let signatures = MockSignatures::matching();
        let directory = MockPayerDirectory::empty();
        let fields = fields_for(UNKNOWN_ACCOUNT, true);

        let (report, trail) = run_with(
            &tampering,
            &behavior,
            &signatures,
            &directory,
            &fields,
            Verdict::pass("Date is valid"),
            Verdict::pass("ok"),
        );

        assert!(report.fraud_detected);
        // The delegated behavior and signature services never ran; the
        // misses themselves are the anomalies.
        assert_eq!(behavior.call_count(), 0);
        assert_eq!(signatures.call_count(), 0);
        let not_found: Vec<_> = trail
            .anomalies()
            .iter()
            .filter(|a| a.details.contains("not found"))
            .collect();
        assert_eq!(not_found.len(), 2);
    }

    #[test]
    fn test_missing_signature_region_is_an_anomaly() {
        let tampering = MockTampering::clean();
        let behavior = MockBehavior::normal();
        let signatures = MockSignatures::matching();
        let directory = known_directory();
        let fields = fields_for(KNOWN_ACCOUNT, false);

        let (report, trail) = run_with(
            &tampering,
            &behavior,
            &signatures,
            &directory,
            &fields,
            Verdict::pass("Date is valid"),
            Verdict::pass("ok"),
        );

        assert!(report.fraud_detected);
        assert_eq!(signatures.call_count(), 0);
        assert!(trail
            .anomalies()
            .iter()
            .any(|a| a.source == SIGNATURE_CHECK && a.details.contains("No signature region")));
    }

    #[test]
    fn test_unloadable_reference_asset_is_an_anomaly() {
        let tampering = MockTampering::clean();
        let behavior = MockBehavior::normal();
        let signatures = MockSignatures::matching();
        let directory = MockPayerDirectory::empty().with_payer_missing_asset(
            &AccountNumber::new(KNOWN_ACCOUNT).unwrap(),
            "Apple Tan",
            "gone.png",
        );
        let fields = fields_for(KNOWN_ACCOUNT, true);

        let (report, trail) = run_with(
            &tampering,
            &behavior,
            &signatures,
            &directory,
            &fields,
            Verdict::pass("Date is valid"),
            Verdict::pass("ok"),
        );

        assert!(report.fraud_detected);
        assert_eq!(signatures.call_count(), 0);
        assert!(trail
            .anomalies()
            .iter()
            .any(|a| a.source == SIGNATURE_CHECK && a.details.contains("Error during comparison")));
    }

    // ── Conservative failure ─────────────────────────────────────────

    #[test]
    fn test_unreachable_tampering_service_flags_conservatively() {
        let dead = UnreachableService;
        let behavior = MockBehavior::normal();
        let signatures = MockSignatures::matching();
        let directory = known_directory();
        let fields = fields_for(KNOWN_ACCOUNT, true);

        let mut trail = AuditTrail::new(CaseId::new());
        let aggregator = FraudAggregator::new(
            FraudChecks {
                tampering: &dead,
                behavior: &behavior,
                signatures: &signatures,
            },
            &directory,
        );
        let image = ImagePayload::new(vec![1]);
        let date = Verdict::pass("Date is valid");
        let amount = Verdict::pass("ok");
        let report = aggregator.run(
            FraudInput {
                image: &image,
                fields: &fields,
                date_check: &date,
                amount_check: &amount,
            },
            &mut trail,
        );

        assert!(report.fraud_detected);
        let tampering_signal = &report.signals[2];
        assert_eq!(tampering_signal.source, TAMPERING_CHECK);
        assert!(tampering_signal.flagged);
        assert!(tampering_signal.reason.contains("unreachable"));
    }
}
