//! # Check-Date Subcommand
//!
//! Runs the cheque-date rules on a raw digit string, for operators
//! triaging date anomalies without a full workflow run.

use chrono::NaiveDate;
use clap::Args;

use cheq_core::{validate_cheque_date, validate_cheque_date_now};

/// Arguments for the check-date subcommand.
#[derive(Args, Debug)]
pub struct CheckDateArgs {
    /// Raw date digits from the cheque (DDMMYY or DDMMYYYY).
    pub date: String,

    /// Reference date for the stale and post-dated windows
    /// (YYYY-MM-DD, defaults to today UTC).
    #[arg(long)]
    pub reference: Option<NaiveDate>,
}

/// Assess the date and print the result.
pub fn run(args: CheckDateArgs) -> anyhow::Result<()> {
    let assessment = match args.reference {
        Some(reference) => validate_cheque_date(&args.date, reference),
        None => validate_cheque_date_now(&args.date),
    };
    println!("valid: {}", assessment.valid);
    println!("reason: {}", assessment.reason);
    Ok(())
}
