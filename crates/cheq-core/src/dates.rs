//! # Cheque Date Rules
//!
//! Programmatic validation of the date written on a cheque. Unlike the
//! delegated checks, date validity is decided here, in code: the rules
//! are fixed banking policy, not visual judgement.
//!
//! ## Rules
//!
//! - Input is a raw digit string, `DDMMYY` or `DDMMYYYY`.
//! - Two-digit years are disambiguated against the reference date's own
//!   two-digit year: suffixes at or below it map to the 2000s, suffixes
//!   above it map to the 1900s.
//! - A date after the reference date is post-dated and rejected.
//! - A date more than 180 days before the reference date is stale and
//!   rejected.
//! - Impossible calendar dates (Feb 30th) are rejected.
//!
//! All results are assessments, not errors: a malformed date string is a
//! failed check with a reason, and the workflow carries it into fraud
//! aggregation rather than aborting.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How many days old a cheque may be before it is considered stale.
pub const STALE_LIMIT_DAYS: i64 = 180;

/// Outcome of the cheque-date check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateAssessment {
    /// Whether the date passed every rule.
    pub valid: bool,
    /// Reason string, suitable for the audit trail verbatim.
    pub reason: String,
}

impl DateAssessment {
    fn pass(reason: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: reason.into(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// Validate a raw cheque date string against a reference date.
///
/// The reference date is "today" from the workflow's point of view; tests
/// pin it to make the stale and post-dated windows deterministic.
pub fn validate_cheque_date(raw: &str, reference: NaiveDate) -> DateAssessment {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return DateAssessment::fail(format!(
            "Invalid format (Expected DDMMYYYY, got {trimmed})"
        ));
    }

    let expanded = if trimmed.len() == 6 {
        expand_two_digit_year(trimmed, reference)
    } else {
        trimmed.to_string()
    };

    if expanded.len() != 8 {
        return DateAssessment::fail(format!(
            "Invalid format (Expected DDMMYYYY, got {expanded})"
        ));
    }

    // Slicing is safe: the string is all-ASCII digits of length 8.
    let day: u32 = expanded[0..2].parse().unwrap_or(0);
    let month: u32 = expanded[2..4].parse().unwrap_or(0);
    let year: i32 = expanded[4..8].parse().unwrap_or(0);

    let Some(cheque_date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return DateAssessment::fail("Invalid calendar date (e.g., Feb 30th)");
    };

    if cheque_date > reference {
        return DateAssessment::fail(format!(
            "Post-dated cheque (Date: {})",
            cheque_date.format("%Y-%m-%d")
        ));
    }

    let stale_limit = reference - Duration::days(STALE_LIMIT_DAYS);
    if cheque_date < stale_limit {
        return DateAssessment::fail(format!(
            "Stale-dated cheque (Date is older than {STALE_LIMIT_DAYS} days)"
        ));
    }

    DateAssessment::pass("Date is valid")
}

/// Validate a raw cheque date string against today's UTC date.
pub fn validate_cheque_date_now(raw: &str) -> DateAssessment {
    validate_cheque_date(raw, Utc::now().date_naive())
}

/// Expand a `DDMMYY` string to `DDMMYYYY` using the reference year's
/// two-digit suffix as the century pivot.
fn expand_two_digit_year(digits: &str, reference: NaiveDate) -> String {
    let year_suffix: u32 = digits[4..6].parse().unwrap_or(0);
    let reference_suffix = (reference.year() % 100) as u32;
    let century = if year_suffix <= reference_suffix {
        "20"
    } else {
        "19"
    };
    format!("{}{}{}", &digits[0..4], century, &digits[4..6])
}
