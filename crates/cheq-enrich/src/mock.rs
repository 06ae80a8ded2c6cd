//! # Mock Enrichment Steps
//!
//! Deterministic implementations of every capability trait. These stand
//! in for the model service in the CLI's demo mode and in the workflow
//! test suites. Each mock counts its invocations so tests can assert the
//! aggregator's no-short-circuit guarantee.
//!
//! `SubstringAccountValidator` is the account-validation placeholder
//! carried over from the first deployment: any account containing the
//! configured needle is "valid". Integrators replace it behind
//! [`AccountValidator`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use cheq_core::{AccountNumber, ExtractedFields, ImagePayload};

use crate::directory::{PayerDirectory, PayerRecord};
use crate::traits::{
    AccountValidator, BehaviorCheck, EnrichError, Extraction, FieldExtractor, ReadabilityCheck,
    SignatureComparator, TamperingCheck, Verdict,
};

/// Fixed-verdict readability check.
#[derive(Debug)]
pub struct MockReadability {
    verdict: Verdict,
    calls: AtomicUsize,
}

impl MockReadability {
    /// A check that approves every image.
    pub fn approving() -> Self {
        Self::with_verdict(Verdict::pass("Image quality is acceptable."))
    }

    /// A check that rejects every image with the given feedback.
    pub fn rejecting(feedback: &str) -> Self {
        Self::with_verdict(Verdict::fail(feedback))
    }

    /// A check returning exactly this verdict.
    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `assess` ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ReadabilityCheck for MockReadability {
    fn assess(&self, _image: &ImagePayload) -> Result<Verdict, EnrichError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.verdict.clone())
    }
}

/// Extractor that returns a pre-scripted extraction for any image.
#[derive(Debug)]
pub struct ScriptedExtractor {
    extraction: Extraction,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    /// Always return the given extraction.
    pub fn new(extraction: Extraction) -> Self {
        Self {
            extraction,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `extract` ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl FieldExtractor for ScriptedExtractor {
    fn extract(&self, _image: &ImagePayload) -> Result<Extraction, EnrichError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.extraction.clone())
    }
}

/// Fixed-verdict tampering check.
#[derive(Debug)]
pub struct MockTampering {
    verdict: Verdict,
    calls: AtomicUsize,
}

impl MockTampering {
    /// A check that sees no tampering anywhere.
    pub fn clean() -> Self {
        Self::with_verdict(Verdict::pass("No signs of alteration."))
    }

    /// A check that flags every image with the given reason.
    pub fn flagging(reason: &str) -> Self {
        Self::with_verdict(Verdict::fail(reason))
    }

    /// A check returning exactly this verdict.
    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `inspect` ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl TamperingCheck for MockTampering {
    fn inspect(&self, _image: &ImagePayload) -> Result<Verdict, EnrichError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.verdict.clone())
    }
}

/// Fixed-verdict behavior check.
#[derive(Debug)]
pub struct MockBehavior {
    verdict: Verdict,
    calls: AtomicUsize,
}

impl MockBehavior {
    /// A check that finds every transaction unremarkable.
    pub fn normal() -> Self {
        Self::with_verdict(Verdict::pass("Transaction fits historical behavior."))
    }

    /// A check that flags every transaction with the given reason.
    pub fn anomalous(reason: &str) -> Self {
        Self::with_verdict(Verdict::fail(reason))
    }

    /// A check returning exactly this verdict.
    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `analyze` ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl BehaviorCheck for MockBehavior {
    fn analyze(
        &self,
        _fields: &ExtractedFields,
        _payer: &PayerRecord,
    ) -> Result<Verdict, EnrichError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.verdict.clone())
    }
}

/// Fixed-verdict signature comparator.
#[derive(Debug)]
pub struct MockSignatures {
    verdict: Verdict,
    calls: AtomicUsize,
}

impl MockSignatures {
    /// A comparator that matches every pair.
    pub fn matching() -> Self {
        Self::with_verdict(Verdict::pass("Stroke style and slant are consistent."))
    }

    /// A comparator that rejects every pair with the given reason.
    pub fn mismatching(reason: &str) -> Self {
        Self::with_verdict(Verdict::fail(reason))
    }

    /// A comparator returning exactly this verdict.
    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `compare` ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SignatureComparator for MockSignatures {
    fn compare(
        &self,
        _candidate: &ImagePayload,
        _reference: &ImagePayload,
    ) -> Result<Verdict, EnrichError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.verdict.clone())
    }
}

/// Account-validation placeholder: any account containing the needle is
/// valid. Deterministic and idempotent.
#[derive(Debug)]
pub struct SubstringAccountValidator {
    needle: String,
    calls: AtomicUsize,
}

impl SubstringAccountValidator {
    /// Validator with the given needle.
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `validate` ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for SubstringAccountValidator {
    fn default() -> Self {
        Self::new("123")
    }
}

impl AccountValidator for SubstringAccountValidator {
    fn validate(&self, account: &AccountNumber) -> Result<Verdict, EnrichError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if account.as_str().contains(&self.needle) {
            Ok(Verdict::pass("Account details are valid."))
        } else {
            Ok(Verdict::fail("Invalid or closed account."))
        }
    }
}

/// Payer directory with in-memory signature assets.
///
/// Unlike [`InMemoryPayerDirectory`](crate::directory::InMemoryPayerDirectory),
/// reference signatures resolve against an in-memory asset map instead of
/// the filesystem, so tests can exercise both the load-success and the
/// load-failure paths deterministically.
#[derive(Debug, Default)]
pub struct MockPayerDirectory {
    records: BTreeMap<String, PayerRecord>,
    assets: BTreeMap<PathBuf, Vec<u8>>,
}

impl MockPayerDirectory {
    /// An empty directory: every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a payer whose signature asset is present.
    pub fn with_payer(mut self, account: &AccountNumber, payer_name: &str, asset: &str) -> Self {
        self.records.insert(
            account.as_str().to_string(),
            PayerRecord {
                payer_name: payer_name.to_string(),
                signature_asset: PathBuf::from(asset),
            },
        );
        self.assets
            .insert(PathBuf::from(asset), b"mock signature bytes".to_vec());
        self
    }

    /// Register a payer whose signature asset is missing, so
    /// `reference_signature` fails for it.
    pub fn with_payer_missing_asset(
        mut self,
        account: &AccountNumber,
        payer_name: &str,
        asset: &str,
    ) -> Self {
        self.records.insert(
            account.as_str().to_string(),
            PayerRecord {
                payer_name: payer_name.to_string(),
                signature_asset: PathBuf::from(asset),
            },
        );
        self
    }
}

impl PayerDirectory for MockPayerDirectory {
    fn lookup(&self, account: &AccountNumber) -> Option<PayerRecord> {
        self.records.get(account.as_str()).cloned()
    }

    fn reference_signature(&self, record: &PayerRecord) -> Result<ImagePayload, EnrichError> {
        self.assets
            .get(&record.signature_asset)
            .map(|bytes| ImagePayload::new(bytes.clone()))
            .ok_or_else(|| {
                EnrichError::AssetUnavailable(format!(
                    "{} not present in mock asset store",
                    record.signature_asset.display()
                ))
            })
    }
}

/// A dead model service: every delegated call errors.
///
/// Implements all the delegated traits so conservative-failure paths can
/// be exercised uniformly.
#[derive(Debug, Default)]
pub struct UnreachableService;

impl ReadabilityCheck for UnreachableService {
    fn assess(&self, _image: &ImagePayload) -> Result<Verdict, EnrichError> {
        Err(EnrichError::ServiceUnavailable("connection refused".to_string()))
    }
}

impl FieldExtractor for UnreachableService {
    fn extract(&self, _image: &ImagePayload) -> Result<Extraction, EnrichError> {
        Err(EnrichError::ServiceUnavailable("connection refused".to_string()))
    }
}

impl TamperingCheck for UnreachableService {
    fn inspect(&self, _image: &ImagePayload) -> Result<Verdict, EnrichError> {
        Err(EnrichError::ServiceUnavailable("connection refused".to_string()))
    }
}

impl BehaviorCheck for UnreachableService {
    fn analyze(
        &self,
        _fields: &ExtractedFields,
        _payer: &PayerRecord,
    ) -> Result<Verdict, EnrichError> {
        Err(EnrichError::ServiceUnavailable("connection refused".to_string()))
    }
}

impl SignatureComparator for UnreachableService {
    fn compare(
        &self,
        _candidate: &ImagePayload,
        _reference: &ImagePayload,
    ) -> Result<Verdict, EnrichError> {
        Err(EnrichError::ServiceUnavailable("connection refused".to_string()))
    }
}

impl AccountValidator for UnreachableService {
    fn validate(&self, _account: &AccountNumber) -> Result<Verdict, EnrichError> {
        Err(EnrichError::ServiceUnavailable("connection refused".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn fields() -> ExtractedFields {
        ExtractedFields {
            payee: "Rentals Inc".to_string(),
            amount: 200.80,
            amount_in_words: Some("TWO HUNDRED DOLLARS AND EIGHTY CENTS".to_string()),
            date_raw: "010124".to_string(),
            account_number: AccountNumber::new("12345678").unwrap(),
            signature_region: None,
            metadata: BTreeMap::new(),
        }
    }

    fn payer() -> PayerRecord {
        PayerRecord {
            payer_name: "Apple Tan".to_string(),
            signature_asset: PathBuf::from("reference_signature.png"),
        }
    }

    #[test]
    fn test_substring_validator_accepts_needle() {
        let v = SubstringAccountValidator::default();
        let verdict = v.validate(&AccountNumber::new("12345678").unwrap()).unwrap();
        assert!(verdict.passed);
        assert_eq!(verdict.reason, "Account details are valid.");
    }

    #[test]
    fn test_substring_validator_rejects_others() {
        let v = SubstringAccountValidator::default();
        let verdict = v.validate(&AccountNumber::new("55556666").unwrap()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, "Invalid or closed account.");
    }

    #[test]
    fn test_substring_validator_is_idempotent() {
        let v = SubstringAccountValidator::default();
        let acct = AccountNumber::new("12345678").unwrap();
        let first = v.validate(&acct).unwrap();
        let second = v.validate(&acct).unwrap();
        assert_eq!(first, second);
        assert_eq!(v.call_count(), 2);
    }

    #[test]
    fn test_mocks_count_calls() {
        let tampering = MockTampering::clean();
        let img = ImagePayload::new(vec![1]);
        tampering.inspect(&img).unwrap();
        tampering.inspect(&img).unwrap();
        assert_eq!(tampering.call_count(), 2);
    }

    #[test]
    fn test_behavior_mock_returns_configured_verdict() {
        let behavior = MockBehavior::anomalous("Amount far exceeds historical maximum.");
        let verdict = behavior.analyze(&fields(), &payer()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, "Amount far exceeds historical maximum.");
    }

    #[test]
    fn test_unreachable_service_errors_everywhere() {
        let dead = UnreachableService;
        let img = ImagePayload::new(vec![1]);
        assert!(dead.assess(&img).is_err());
        assert!(dead.extract(&img).is_err());
        assert!(dead.inspect(&img).is_err());
        assert!(dead.analyze(&fields(), &payer()).is_err());
        assert!(dead.compare(&img, &img).is_err());
        assert!(dead
            .validate(&AccountNumber::new("12345678").unwrap())
            .is_err());
    }
}
