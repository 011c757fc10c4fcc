//! Gemini vision client for document analysis using Google's Generative Language API

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::extractor::{VisionError, VisionExtractor};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client for the generateContent API.
///
/// One request per document, no retries. Credential, rate-limit, and
/// transient failures are reported as distinct [`VisionError`] variants so
/// callers can map them to distinct statuses.
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish()
    }
}

// generateContent request/response structures
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout_secs: u64) -> Result<Self> {
        if api_key.is_empty() {
            anyhow::bail!("Gemini API key is required but not provided");
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client for Gemini")?;

        Ok(Self {
            http_client,
            api_key,
            model,
            api_base: API_BASE.to_string(),
        })
    }

    /// Point the client at an alternate API base. Used by tests with a
    /// local mock server.
    #[doc(hidden)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        )
    }
}

#[async_trait]
impl VisionExtractor for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn extract(
        &self,
        document: Bytes,
        content_type: &str,
        prompt: &str,
    ) -> Result<String, VisionError> {
        use base64::Engine;
        let base64_document = base64::engine::general_purpose::STANDARD.encode(&document);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: content_type.to_string(),
                            data: base64_document,
                        },
                    },
                ],
            }],
        };

        tracing::debug!(
            model = %self.model,
            document_size = document.len(),
            content_type = %content_type,
            "Sending document to Gemini"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Transient(format!("Gemini request timed out: {}", e))
                } else {
                    VisionError::Transient(format!("Failed to reach Gemini: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => VisionError::InvalidCredentials(format!(
                    "Gemini rejected the API key: {} - {}",
                    status, error_text
                )),
                429 => VisionError::RateLimited(format!(
                    "Gemini rate limit hit: {} - {}",
                    status, error_text
                )),
                _ => VisionError::Transient(format!(
                    "Gemini request failed: {} - {}",
                    status, error_text
                )),
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            VisionError::Transient(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                VisionError::Transient("Gemini returned no candidates".to_string())
            })?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        let result = GeminiClient::new(String::new(), "gemini-1.5-flash".to_string(), 60);
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_includes_model_and_key() {
        let client = GeminiClient::new("test-key".to_string(), "gemini-1.5-flash".to_string(), 60)
            .expect("client");
        let endpoint = client.endpoint();
        assert!(endpoint.contains("/models/gemini-1.5-flash:generateContent"));
        assert!(endpoint.ends_with("key=test-key"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "describe".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: "aGVsbG8=".to_string(),
                        },
                    },
                ],
            }],
        };

        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "describe");
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["data"],
            "aGVsbG8="
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"isValid\": true"}, {"text": "}"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).expect("parse");
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        assert_eq!(text, "{\"isValid\": true}");
    }

    #[test]
    fn test_empty_candidates_deserializes() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").expect("parse");
        assert!(parsed.candidates.is_empty());
    }
}
