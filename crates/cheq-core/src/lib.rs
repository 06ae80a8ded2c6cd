//! # cheq-core — Foundational Types for the Cheque Intake Stack
//!
//! This crate is the bedrock of the cheque intake workflow. It defines the
//! type-system primitives every other crate builds on. It depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `CaseId` and
//!    `AccountNumber` are newtypes with validated constructors. No bare
//!    strings for identifiers.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so audit records render identically
//!    wherever they are replayed.
//!
//! 3. **Content-addressed intake.** Every scanned image is fingerprinted
//!    through `ContentDigest`, tying an audit trail to the exact bytes it
//!    describes.
//!
//! 4. **Typed extraction output.** `ExtractedFields` has no optional
//!    required fields: if extraction succeeds, downstream steps cannot
//!    observe a half-populated record.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cheq-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public data types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a boundary.

pub mod dates;
pub mod digest;
pub mod error;
pub mod fields;
pub mod identity;
pub mod image;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use dates::{validate_cheque_date, validate_cheque_date_now, DateAssessment};
pub use digest::{sha256_digest, ContentDigest};
pub use error::CheqError;
pub use fields::ExtractedFields;
pub use identity::{AccountNumber, CaseId};
pub use image::ImagePayload;
pub use temporal::Timestamp;
