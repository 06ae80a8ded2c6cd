//! # Enrichment Check Traits
//!
//! One narrow trait per delegated check. Implementations are stateless
//! with respect to the case: they read the inputs given and return a
//! result; the orchestrator applies it. Repeated calls on the same input
//! must yield the same verdict.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cheq_core::{AccountNumber, ExtractedFields, ImagePayload};

use crate::directory::PayerRecord;

/// Error from a delegated enrichment service.
///
/// These never escape a workflow run: the caller converts them into
/// conservative verdicts at the point of invocation.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// The backing service could not be reached.
    #[error("service unreachable: {0}")]
    ServiceUnavailable(String),

    /// The service responded but its payload could not be interpreted.
    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    /// A reference asset (e.g. a stored signature image) could not be loaded.
    #[error("reference asset unavailable: {0}")]
    AssetUnavailable(String),

    /// The extraction service could not produce a complete field set.
    #[error("extraction incomplete: {0}")]
    ExtractionIncomplete(String),

    /// A payer directory file could not be read or was structurally invalid.
    #[error("invalid payer directory: {0}")]
    InvalidDirectory(String),
}

/// Result shape shared by every delegated check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the check's expectation held.
    pub passed: bool,
    /// Free-text justification, carried into the audit trail verbatim.
    pub reason: String,
    /// Optional structured extras from the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl Verdict {
    /// A passing verdict.
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
            extra: None,
        }
    }

    /// A failing verdict.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
            extra: None,
        }
    }

    /// Attach structured extras.
    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Resolve a delegated-step result conservatively.
    ///
    /// `Ok` passes through; `Err` becomes a failed verdict naming the
    /// check and the underlying problem. This is the single point where
    /// service failures turn into anomaly signals instead of faults.
    pub fn or_conservative(result: Result<Verdict, EnrichError>, check: &str) -> Verdict {
        match result {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(check, "delegated step failed: {e}");
                Verdict::fail(format!("{check} analysis failed ({e}); flagging for review."))
            }
        }
    }
}

/// Output of the field-extraction step.
///
/// The delegated amount-consistency judgement rides along with the typed
/// fields: both come back from the same extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The complete typed field set.
    pub fields: ExtractedFields,
    /// Delegated verdict on courtesy-vs-legal amount consistency.
    pub amount_check: Verdict,
}

/// Judges whether a scanned image is clean enough to process.
pub trait ReadabilityCheck: Send + Sync {
    /// Assess image quality. A failing verdict's reason is user-facing
    /// feedback ("Image is too dark").
    fn assess(&self, image: &ImagePayload) -> Result<Verdict, EnrichError>;
}

/// Extracts the structured field set from a cheque image.
pub trait FieldExtractor: Send + Sync {
    /// Extract and validate fields. Returns an error when any required
    /// field cannot be produced; partial field sets do not exist.
    fn extract(&self, image: &ImagePayload) -> Result<Extraction, EnrichError>;
}

/// Looks for signs of visual alteration on the cheque.
pub trait TamperingCheck: Send + Sync {
    /// Inspect the full image. A failing verdict means tampering is
    /// suspected.
    fn inspect(&self, image: &ImagePayload) -> Result<Verdict, EnrichError>;
}

/// Judges whether a transaction fits the payer's historical behavior.
pub trait BehaviorCheck: Send + Sync {
    /// Analyze the transaction against the payer's record. A failing
    /// verdict means the transaction is behaviorally anomalous.
    fn analyze(
        &self,
        fields: &ExtractedFields,
        payer: &PayerRecord,
    ) -> Result<Verdict, EnrichError>;
}

/// Compares a cheque signature against the payer's reference signature.
pub trait SignatureComparator: Send + Sync {
    /// Compare the two signature images. A failing verdict means the
    /// signatures do not appear to be from the same hand.
    fn compare(
        &self,
        candidate: &ImagePayload,
        reference: &ImagePayload,
    ) -> Result<Verdict, EnrichError>;
}

/// Validates an account against the banking back end.
pub trait AccountValidator: Send + Sync {
    /// Check whether the account can accept this cheque. Must be
    /// idempotent: repeated calls with the same account yield the same
    /// verdict.
    fn validate(&self, account: &AccountNumber) -> Result<Verdict, EnrichError>;
}
