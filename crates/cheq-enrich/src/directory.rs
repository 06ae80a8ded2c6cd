//! # Payer Directory
//!
//! Read-only lookup from account number to payer identity and reference
//! signature asset. The directory is shared by every concurrent run and
//! never mutated by the workflow; absence of an account is a valid
//! lookup result, not an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cheq_core::{AccountNumber, ImagePayload};

use crate::traits::EnrichError;

/// One payer's directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerRecord {
    /// Account holder's name.
    pub payer_name: String,
    /// Reference signature image path, relative to the directory's base.
    pub signature_asset: PathBuf,
}

/// Read-only payer lookup shared across runs.
pub trait PayerDirectory: Send + Sync {
    /// Look up a payer by account number. `None` means the account is
    /// not on file.
    fn lookup(&self, account: &AccountNumber) -> Option<PayerRecord>;

    /// Load the reference signature asset named by a record.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::AssetUnavailable`] when the asset cannot be
    /// read.
    fn reference_signature(&self, record: &PayerRecord) -> Result<ImagePayload, EnrichError>;
}

/// In-memory directory backed by a JSON file.
///
/// File format: an object keyed by account number, e.g.
///
/// ```json
/// {
///   "12345678": {
///     "payer_name": "Apple Tan",
///     "signature_asset": "reference_signature.png"
///   }
/// }
/// ```
///
/// Asset paths resolve against the base directory given at construction.
#[derive(Debug, Clone)]
pub struct InMemoryPayerDirectory {
    base_dir: PathBuf,
    records: BTreeMap<String, PayerRecord>,
}

impl InMemoryPayerDirectory {
    /// Create an empty directory with the given asset base.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            records: BTreeMap::new(),
        }
    }

    /// Insert one payer record.
    pub fn insert(&mut self, account: AccountNumber, record: PayerRecord) {
        self.records.insert(account.as_str().to_string(), record);
    }

    /// Load a directory from a JSON file. Asset paths resolve against
    /// `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::InvalidDirectory`] when the file cannot be
    /// read, is not valid JSON, or contains a key that is not a valid
    /// account number.
    pub fn load(path: &Path, base_dir: impl Into<PathBuf>) -> Result<Self, EnrichError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EnrichError::InvalidDirectory(format!("{}: {e}", path.display()))
        })?;
        let raw: BTreeMap<String, PayerRecord> = serde_json::from_str(&text).map_err(|e| {
            EnrichError::InvalidDirectory(format!("{}: {e}", path.display()))
        })?;

        let mut dir = Self::new(base_dir);
        for (key, record) in raw {
            let account = AccountNumber::new(&key).map_err(|e| {
                EnrichError::InvalidDirectory(format!("bad account key {key:?}: {e}"))
            })?;
            dir.insert(account, record);
        }
        Ok(dir)
    }

    /// Number of payers on file.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the directory has no payers.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PayerDirectory for InMemoryPayerDirectory {
    fn lookup(&self, account: &AccountNumber) -> Option<PayerRecord> {
        // AccountNumber is already trimmed and quote-stripped at
        // construction, so the key matches the file's digit strings.
        self.records.get(account.as_str()).cloned()
    }

    fn reference_signature(&self, record: &PayerRecord) -> Result<ImagePayload, EnrichError> {
        let path = self.base_dir.join(&record.signature_asset);
        ImagePayload::read_from(&path)
            .map_err(|e| EnrichError::AssetUnavailable(format!("{}: {e}", path.display())))
    }
}
