use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Best-effort personal information extracted from a document. Every field
/// is individually optional; an absent field must stay absent rather than
/// defaulting to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    /// YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

/// Structured result of a vision-model review of one document. Stored as
/// jsonb on the owning application with overwrite semantics (one review per
/// application, no history). The serialized shape is a contract consumed by
/// the UI: camelCase keys, `confidence` an integer in 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiReview {
    pub is_valid: bool,
    pub is_blurry: bool,
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub confidence: u8,
}
