//! # cheq-cli — Cheque Intake Command-Line Interface
//!
//! Operational front end for the workflow engine.
//!
//! ## Subcommands
//!
//! - `process` — drive one cheque image through the full workflow
//!   against a payer directory file, with an extraction fixture standing
//!   in for the vision service.
//! - `check-date` — run the cheque-date rules on a raw digit string.
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to the workflow crates; no decision
//!   logic lives here.

pub mod datecheck;
pub mod process;
