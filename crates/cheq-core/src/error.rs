//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the cheque intake stack. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Constructor validation fails loudly with the offending input.
//! - Delegated-step failures are NOT modelled here: they are resolved
//!   into conservative verdicts at the point of invocation and never
//!   propagate as errors out of a workflow run.

use thiserror::Error;

/// Top-level error type for the cheque intake stack.
#[derive(Error, Debug)]
pub enum CheqError {
    /// An account number failed constructor validation.
    #[error("invalid account number: {0}")]
    InvalidAccountNumber(String),

    /// A timestamp string failed parsing or was not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// IO error while reading an image payload or asset.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
