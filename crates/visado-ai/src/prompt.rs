//! The fixed instruction prompt sent with every document review.

/// Instruction prompt for the vision model.
///
/// Asks for validity and blurriness assessment, extraction of a fixed set of
/// personal-info fields, issue and recommendation lists, and a confidence
/// score - returned as a single JSON object and nothing else. The schema
/// here must stay in sync with `visado_core::models::AiReview`.
const REVIEW_PROMPT: &str = r#"You are a visa application specialist. Examine the attached document carefully and assess its validity, clarity, and suitability for a visa application.

Extract the following and evaluate the document:

1. Personal information:
   - First name (firstName)
   - Last name (lastName)
   - Passport number (passportNumber)
   - Expiry date (expiryDate)
   - Date of birth (dateOfBirth)
   - Nationality (nationality)

2. Document assessment:
   - Is the document valid? (isValid: boolean)
   - Is the document blurry? (isBlurry: boolean)
   - Detected issues (issues: string[])
   - Recommendations (recommendations: string[])
   - Confidence score between 0 and 100 (confidence: number)

Return the result as JSON only. Do not add any explanation outside the JSON.

JSON format:
{
  "isValid": boolean,
  "isBlurry": boolean,
  "personalInfo": {
    "firstName": "string or null",
    "lastName": "string or null",
    "passportNumber": "string or null",
    "expiryDate": "YYYY-MM-DD or null",
    "dateOfBirth": "YYYY-MM-DD or null",
    "nationality": "string or null"
  },
  "issues": ["issue1", "issue2"],
  "recommendations": ["recommendation1", "recommendation2"],
  "confidence": 85
}"#;

/// The fixed review instruction prompt.
pub fn review_prompt() -> &'static str {
    REVIEW_PROMPT
}
