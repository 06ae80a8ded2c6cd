//! # cheq-workflow — The Case Workflow Engine
//!
//! Drives one cheque from image intake to a terminal decision. The
//! control flow is an explicit finite-state machine:
//!
//! ```text
//! Start ──▶ QualityCheck ──▶ Extract ──▶ FraudScan ──▶ ValidateAccount
//!               │                │            │               │     │
//!               ▼                ▼            ▼               ▼     ▼
//!          ManualReview     ManualReview  ManualReview    Approved Rejected
//! ```
//!
//! The graph is a strict DAG: no state is revisited, each edge condition
//! is evaluated exactly once, and every run collapses to one of the
//! three terminals. The transition function is pure over `(state, Case)`
//! so every branch is exhaustively testable.
//!
//! ## Failure Composition
//!
//! Delegated-step failures are resolved into conservative verdicts at
//! the point of invocation; [`CaseOrchestrator::run()`] is infallible by
//! construction. A run that could not reach a terminal state would be a
//! programming defect, not a valid outcome.

pub mod case;
pub mod machine;
pub mod orchestrator;

pub use case::{Case, CaseFlags, CaseOutcome, Decision, TransitionRecord};
pub use machine::{next_state, CaseState};
pub use orchestrator::{CaseOrchestrator, EnrichmentSuite};
