//! # Content Digest — Fingerprinting Intake Images
//!
//! Defines `ContentDigest`, the SHA-256 fingerprint recorded for every
//! scanned image at case start. An audit trail that names the digest of
//! its input can be tied back to the exact bytes that were processed,
//! which is what makes a trail replayable rather than merely descriptive.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a digest from raw bytes.
    ///
    /// Prefer [`sha256_digest()`] for computing digests over payloads.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 content digest of a byte payload.
pub fn sha256_digest(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_digest_deterministic() {
        let d1 = sha256_digest(b"cheque image bytes");
        let d2 = sha256_digest(b"cheque image bytes");
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_different_inputs_different_digests() {
        assert_ne!(sha256_digest(b"a"), sha256_digest(b"b"));
    }

    #[test]
    fn test_display_format() {
        let d = sha256_digest(b"x");
        let s = format!("{d}");
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    #[test]
    fn test_known_sha256_vector() {
        // SHA256("") — verified against Python hashlib.sha256(b"").hexdigest()
        let d = sha256_digest(b"");
        assert_eq!(
            d.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
