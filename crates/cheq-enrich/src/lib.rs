//! # cheq-enrich — Enrichment Capability Boundary
//!
//! Every judgement the workflow cannot make programmatically (is the scan
//! readable, do the signatures match, has the image been altered) is
//! delegated through the trait interfaces in this crate. The workflow
//! core only ever sees a [`Verdict`]: a pass/fail flag, a reason string,
//! and optional structured extras.
//!
//! ## Conservative-Failure Contract
//!
//! A delegated service that is unreachable or returns garbage must not
//! take the workflow down. Trait methods surface such problems as
//! [`EnrichError`]; callers convert them with
//! [`Verdict::or_conservative()`] into a failed verdict with a
//! descriptive reason. For fraud-type checks that means flag-as-anomaly;
//! for the quality check it means not-readable.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): one narrow trait per check, all
//!   `Send + Sync`, idempotent and free of case-state mutation.
//! - **Directory** (`directory.rs`): read-only payer lookup shared by
//!   concurrent runs.
//! - **Wire** (`wire.rs`): tolerant parsing of model-service JSON
//!   responses, including fenced and prose-embedded objects.
//! - **Mocks** (`mock.rs`): deterministic in-tree implementations behind
//!   the same traits, used by the CLI and the test suites.

pub mod directory;
pub mod mock;
pub mod traits;
pub mod wire;

pub use directory::{InMemoryPayerDirectory, PayerDirectory, PayerRecord};
pub use traits::{
    AccountValidator, BehaviorCheck, EnrichError, Extraction, FieldExtractor, ReadabilityCheck,
    SignatureComparator, TamperingCheck, Verdict,
};
