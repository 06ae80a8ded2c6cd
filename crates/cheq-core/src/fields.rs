//! # Extracted Field Records
//!
//! `ExtractedFields` is the typed output of the field-extraction step.
//! Every required field is non-optional: a value of this type existing at
//! all means extraction completed, so downstream checks never observe a
//! half-populated record. Extraction failure is an error at the
//! extraction boundary, not a record with holes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::AccountNumber;
use crate::image::ImagePayload;

/// Structured data lifted from one cheque image.
///
/// Populated once by the extraction step and read-only thereafter.
/// The signature region is image bytes and is never serialized into
/// reports; its presence is what the signature-verification check keys on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Payee name as written on the cheque.
    pub payee: String,

    /// Courtesy amount (the numeric figure).
    pub amount: f64,

    /// Legal amount (the amount written in words), when legible.
    pub amount_in_words: Option<String>,

    /// Raw date digits as printed, `DDMMYY` or `DDMMYYYY`.
    pub date_raw: String,

    /// Payer account number parsed from the MICR line.
    pub account_number: AccountNumber,

    /// Cropped signature region, when one was located on the cheque.
    #[serde(skip)]
    pub signature_region: Option<ImagePayload>,

    /// Free-form extras from the extraction service (MICR line, bounding
    /// boxes, model confidence notes).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ExtractedFields {
    /// Render the fields as a JSON object for the case outcome.
    ///
    /// The signature region is omitted by serde policy; callers get the
    /// report-safe view of the record.
    pub fn to_report_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> ExtractedFields {
        ExtractedFields {
            payee: "Utility Company".to_string(),
            amount: 150.25,
            amount_in_words: Some("ONE HUNDRED FIFTY & 25/100".to_string()),
            date_raw: "010124".to_string(),
            account_number: AccountNumber::new("12345678").unwrap(),
            signature_region: Some(ImagePayload::new(vec![0xAB; 64])),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_report_json_omits_signature_bytes() {
        let json = sample_fields().to_report_json();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("payee"));
        assert!(obj.contains_key("amount"));
        assert!(obj.contains_key("account_number"));
        assert!(!obj.contains_key("signature_region"));
    }

    #[test]
    fn test_report_json_values() {
        let json = sample_fields().to_report_json();
        assert_eq!(json["payee"], "Utility Company");
        assert_eq!(json["account_number"], "12345678");
        assert_eq!(json["date_raw"], "010124");
    }

    #[test]
    fn test_empty_metadata_omitted() {
        let json = sample_fields().to_report_json();
        assert!(!json.as_object().unwrap().contains_key("metadata"));
    }
}
