//! # Model-Response Wire Parsing
//!
//! Model services asked for JSON do not reliably return bare JSON: the
//! object may arrive fenced in markdown or embedded in prose. This
//! module extracts and interprets such responses tolerantly, and maps
//! each check's key pair onto a [`Verdict`] with the right polarity
//! (`is_tampered: true` is a *failed* verdict; `is_readable: true` is a
//! passing one).
//!
//! Responses that contain no interpretable JSON object become
//! [`EnrichError::MalformedResponse`], never a raw parser fault.

use serde_json::Value;

use cheq_core::ImagePayload;

use crate::traits::{EnrichError, ReadabilityCheck, TamperingCheck, Verdict};

/// How one check's response keys map onto a verdict.
#[derive(Debug, Clone, Copy)]
pub struct VerdictShape {
    /// Key holding the boolean flag.
    pub flag_key: &'static str,
    /// Key holding the justification string.
    pub reason_key: &'static str,
    /// Whether a `true` flag means the check failed.
    pub flag_means_failure: bool,
}

/// `{"is_readable": bool, "feedback": string}` — true means readable.
pub const READABILITY_SHAPE: VerdictShape = VerdictShape {
    flag_key: "is_readable",
    reason_key: "feedback",
    flag_means_failure: false,
};

/// `{"is_tampered": bool, "reason": string}` — true means tampered.
pub const TAMPERING_SHAPE: VerdictShape = VerdictShape {
    flag_key: "is_tampered",
    reason_key: "reason",
    flag_means_failure: true,
};

/// `{"is_anomalous": bool, "reason": string}` — true means anomalous.
pub const BEHAVIOR_SHAPE: VerdictShape = VerdictShape {
    flag_key: "is_anomalous",
    reason_key: "reason",
    flag_means_failure: true,
};

/// `{"signatures_match": bool, "reason": string}` — true means a match.
pub const SIGNATURE_SHAPE: VerdictShape = VerdictShape {
    flag_key: "signatures_match",
    reason_key: "reason",
    flag_means_failure: false,
};

/// Extract a JSON object from a raw service response.
///
/// Accepts a bare object, a markdown-fenced block, or an object embedded
/// in surrounding prose (anything between the first `{` and the last
/// `}`).
pub fn parse_json_block(content: &str) -> Result<Value, EnrichError> {
    if let Ok(value) = serde_json::from_str::<Value>(content.trim()) {
        if value.is_object() {
            return Ok(value);
        }
    }

    // Fenced or prose-embedded: take the outermost brace span.
    let start = content.find('{');
    let end = content.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&content[start..=end]) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
    }

    Err(EnrichError::MalformedResponse(format!(
        "no JSON object found in response: {}",
        truncate(content, 120)
    )))
}

/// Interpret a raw service response as a verdict of the given shape.
///
/// Missing flag keys default to `false`, matching the services' own
/// contract: an absent `is_tampered` reads as not-tampered, an absent
/// `is_readable` reads as not-readable.
pub fn parse_verdict(content: &str, shape: &VerdictShape) -> Result<Verdict, EnrichError> {
    let value = parse_json_block(content)?;
    let flag = value
        .get(shape.flag_key)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let reason = value
        .get(shape.reason_key)
        .and_then(Value::as_str)
        .unwrap_or("No reason provided.")
        .to_string();

    let passed = if shape.flag_means_failure { !flag } else { flag };
    Ok(Verdict {
        passed,
        reason,
        extra: None,
    })
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Adapter from a raw-response transport to a check trait.
///
/// The transport closure does whatever it takes to get a response string
/// for an image (HTTP call, queue round-trip, canned fixture); this
/// adapter owns the parsing and polarity. Which trait the adapter
/// satisfies follows from the shape it is built with.
pub struct JsonVerdictCheck<F> {
    shape: VerdictShape,
    transport: F,
}

impl<F> JsonVerdictCheck<F>
where
    F: Fn(&ImagePayload) -> Result<String, EnrichError> + Send + Sync,
{
    /// Wrap a transport with a response shape.
    pub fn new(shape: VerdictShape, transport: F) -> Self {
        Self { shape, transport }
    }

    fn evaluate(&self, image: &ImagePayload) -> Result<Verdict, EnrichError> {
        let response = (self.transport)(image)?;
        parse_verdict(&response, &self.shape)
    }
}

impl<F> ReadabilityCheck for JsonVerdictCheck<F>
where
    F: Fn(&ImagePayload) -> Result<String, EnrichError> + Send + Sync,
{
    fn assess(&self, image: &ImagePayload) -> Result<Verdict, EnrichError> {
        self.evaluate(image)
    }
}

impl<F> TamperingCheck for JsonVerdictCheck<F>
where
    F: Fn(&ImagePayload) -> Result<String, EnrichError> + Send + Sync,
{
    fn inspect(&self, image: &ImagePayload) -> Result<Verdict, EnrichError> {
        self.evaluate(image)
    }
}
