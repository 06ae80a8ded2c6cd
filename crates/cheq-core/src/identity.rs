//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers in the cheque intake stack.
//! These prevent accidental identifier confusion: you cannot pass an
//! `AccountNumber` where a `CaseId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CheqError;

/// Unique identifier for one cheque processing run.
///
/// Rendered as `cheque-<8 hex chars>` in logs and reports, the form the
/// intake pipeline stamps on every audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub Uuid);

impl CaseId {
    /// Generate a new random case identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The short display form, e.g. `cheque-1a2b3c4d`.
    pub fn short(&self) -> String {
        let hex = self.0.simple().to_string();
        format!("cheque-{}", &hex[..8])
    }
}

impl Default for CaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.short())
    }
}

/// A payer account number parsed from the MICR line.
///
/// Validated at construction: surrounding whitespace and stray quote
/// characters from upstream OCR output are stripped, and the remainder
/// must be a non-empty ASCII digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Construct a validated account number.
    ///
    /// # Errors
    ///
    /// Returns [`CheqError::InvalidAccountNumber`] if the cleaned input is
    /// empty or contains a non-digit character.
    pub fn new(raw: &str) -> Result<Self, CheqError> {
        let cleaned: String = raw.trim().chars().filter(|c| *c != '"').collect();
        if cleaned.is_empty() {
            return Err(CheqError::InvalidAccountNumber(
                "empty account number".to_string(),
            ));
        }
        if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CheqError::InvalidAccountNumber(format!(
                "non-digit character in {cleaned:?}"
            )));
        }
        Ok(Self(cleaned))
    }

    /// The digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
