//! # Image Payload
//!
//! `ImagePayload` carries raw scanned-image bytes through the workflow.
//! The core never decodes pixels; enhancement, cropping, and visual
//! judgement belong to the delegated enrichment services. The payload's
//! only structural obligation is to be fingerprintable.

use std::path::Path;

use crate::digest::{sha256_digest, ContentDigest};
use crate::error::CheqError;

/// Raw image bytes for a scanned cheque or a signature region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload(Vec<u8>);

impl ImagePayload {
    /// Wrap raw image bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Read an image payload from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CheqError::Io`] if the file cannot be read.
    pub fn read_from(path: &Path) -> Result<Self, CheqError> {
        Ok(Self(std::fs::read(path)?))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the payload.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// SHA-256 fingerprint of the payload.
    pub fn digest(&self) -> ContentDigest {
        sha256_digest(&self.0)
    }
}

impl From<Vec<u8>> for ImagePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
