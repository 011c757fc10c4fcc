//! Defensive parsing of the model's review output.
//!
//! The model's output is untrusted free text. The parser strips markdown
//! code fences, parses JSON, and requires the two boolean assessment fields
//! to be present and actually boolean; it tolerates null or absent
//! personal-info fields but never invents defaults for the assessment. A
//! wrong default (e.g. a missing passport number becoming an empty string)
//! is worse than surfacing an error.

use serde::Deserialize;
use visado_core::models::{AiReview, PersonalInfo};
use visado_core::AppError;

/// Loose mirror of the review schema: everything beyond the two required
/// booleans is optional and normalized afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReview {
    is_valid: bool,
    is_blurry: bool,
    #[serde(default)]
    personal_info: Option<PersonalInfo>,
    #[serde(default)]
    issues: Option<Vec<String>>,
    #[serde(default)]
    recommendations: Option<Vec<String>>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Strip surrounding markdown code-fence markup (```json ... ``` or
/// ``` ... ```) from a model reply, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string on the opening fence line (e.g. "json").
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse and validate a raw model reply into an [`AiReview`].
///
/// Fails with `MalformedResponse` when the reply is not JSON or the
/// `isValid`/`isBlurry` booleans are missing or mistyped. Confidence is
/// clamped into 0..=100.
pub fn parse_review(raw: &str) -> Result<AiReview, AppError> {
    let body = strip_code_fences(raw);

    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        AppError::MalformedResponse(format!("Model reply is not valid JSON: {}", e))
    })?;

    // Check the required booleans explicitly so the error names the field
    // instead of surfacing a generic serde message.
    for field in ["isValid", "isBlurry"] {
        match value.get(field) {
            Some(v) if v.is_boolean() => {}
            Some(_) => {
                return Err(AppError::MalformedResponse(format!(
                    "Field '{}' is not a boolean",
                    field
                )))
            }
            None => {
                return Err(AppError::MalformedResponse(format!(
                    "Missing required field '{}'",
                    field
                )))
            }
        }
    }

    let raw: RawReview = serde_json::from_value(value).map_err(|e| {
        AppError::MalformedResponse(format!("Model reply does not match review schema: {}", e))
    })?;

    let confidence = raw
        .confidence
        .map(|c| c.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0);

    Ok(AiReview {
        is_valid: raw.is_valid,
        is_blurry: raw.is_blurry,
        personal_info: raw.personal_info.unwrap_or_default(),
        issues: raw.issues.unwrap_or_default(),
        recommendations: raw.recommendations.unwrap_or_default(),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"{
        "isValid": true,
        "isBlurry": false,
        "personalInfo": {
            "firstName": "Ada",
            "lastName": "Lovelace",
            "passportNumber": "U12345678",
            "expiryDate": "2030-01-15",
            "dateOfBirth": "1990-12-10",
            "nationality": "GBR"
        },
        "issues": [],
        "recommendations": ["Provide a colour scan"],
        "confidence": 85
    }"#;

    #[test]
    fn test_parses_complete_reply() {
        let review = parse_review(COMPLETE).expect("parse");
        assert!(review.is_valid);
        assert!(!review.is_blurry);
        assert_eq!(review.personal_info.first_name.as_deref(), Some("Ada"));
        assert_eq!(review.confidence, 85);
        assert_eq!(review.recommendations.len(), 1);
    }

    #[test]
    fn test_fenced_reply_equals_unfenced() {
        let fenced = format!("```json\n{}\n```", COMPLETE);
        assert_eq!(
            parse_review(&fenced).expect("fenced"),
            parse_review(COMPLETE).expect("plain")
        );

        let bare_fence = format!("```\n{}\n```", COMPLETE);
        assert_eq!(
            parse_review(&bare_fence).expect("bare fence"),
            parse_review(COMPLETE).expect("plain")
        );
    }

    #[test]
    fn test_missing_is_valid_is_malformed() {
        let err = parse_review(r#"{"isBlurry": false}"#).unwrap_err();
        match err {
            AppError::MalformedResponse(msg) => assert!(msg.contains("isValid")),
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_non_boolean_is_blurry_is_malformed() {
        let err = parse_review(r#"{"isValid": true, "isBlurry": "no"}"#).unwrap_err();
        match err {
            AppError::MalformedResponse(msg) => assert!(msg.contains("isBlurry")),
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_reply_is_malformed() {
        let err = parse_review("I could not read the document, sorry.").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_null_personal_info_tolerated() {
        let review = parse_review(
            r#"{"isValid": false, "isBlurry": true, "personalInfo": null, "issues": null}"#,
        )
        .expect("parse");
        assert_eq!(review.personal_info, PersonalInfo::default());
        assert!(review.issues.is_empty());
        assert_eq!(review.confidence, 0);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let review =
            parse_review(r#"{"isValid": true, "isBlurry": false, "confidence": 250}"#).expect("parse");
        assert_eq!(review.confidence, 100);

        let review =
            parse_review(r#"{"isValid": true, "isBlurry": false, "confidence": -3}"#).expect("parse");
        assert_eq!(review.confidence, 0);

        let review = parse_review(r#"{"isValid": true, "isBlurry": false, "confidence": 72.6}"#)
            .expect("parse");
        assert_eq!(review.confidence, 73);
    }

    #[test]
    fn test_strip_code_fences_passthrough() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }
}
