//! Google Gemini provider
//!
//! Calls the Generative Language REST API (`models/{model}:generateContent`)
//! with the whole prompt as a single user part.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::ProviderError;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL, e.g. https://generativelanguage.googleapis.com/v1beta
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Error envelope returned by the API on non-2xx
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        check_status(status, &body)?;
        extract_text(&body)
    }
}

/// Turn a non-2xx response into an error, preferring the API's own message
fn check_status(status: StatusCode, body: &str) -> Result<(), ProviderError> {
    if status.is_success() {
        return Ok(());
    }

    if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(body) {
        return Err(ProviderError::InvalidResponse(format!(
            "API error ({}): {}",
            status, error_resp.error.message
        )));
    }

    Err(ProviderError::InvalidResponse(format!(
        "HTTP {}: {}",
        status, body
    )))
}

/// Pull the generated text out of a `generateContent` response body.
///
/// The text parts of the first candidate are concatenated as-is.
fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
    })?;

    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| ProviderError::InvalidResponse("No candidates in response".to_string()))?;

    let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "Candidate has no text parts".to_string(),
        ));
    }

    Ok(texts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("Persona\nUser: hi\nBot:".into()),
                }],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "contents": [{ "parts": [{ "text": "Persona\nUser: hi\nBot:" }] }] })
        );
    }

    #[test]
    fn test_extract_text() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Ugh, fine 😴 " }, { "text": "it's 4 🙃" }]
                },
                "finishReason": "STOP"
            }]
        })
        .to_string();

        assert_eq!(extract_text(&body).unwrap(), "Ugh, fine 😴 it's 4 🙃");
    }

    #[test]
    fn test_extract_text_keeps_whitespace() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  padded\n\n" }] } }]
        })
        .to_string();

        assert_eq!(extract_text(&body).unwrap(), "  padded\n\n");
    }

    #[test]
    fn test_check_status_success() {
        assert!(check_status(StatusCode::OK, "{}").is_ok());
    }

    #[test]
    fn test_check_status_error_envelope() {
        let body = json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })
        .to_string();

        match check_status(StatusCode::BAD_REQUEST, &body) {
            Err(ProviderError::InvalidResponse(msg)) => {
                assert_eq!(
                    msg,
                    "API error (400 Bad Request): API key not valid. Please pass a valid API key."
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_check_status_plain_body() {
        match check_status(StatusCode::SERVICE_UNAVAILABLE, "upstream connect error") {
            Err(ProviderError::InvalidResponse(msg)) => {
                assert_eq!(msg, "HTTP 503 Service Unavailable: upstream connect error");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_responses() {
        for body in [
            "not json".to_string(),
            json!({ "candidates": [] }).to_string(),
            json!({}).to_string(),
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }).to_string(),
            json!({ "candidates": [{ "content": { "parts": [] } }] }).to_string(),
        ] {
            let err = extract_text(&body).unwrap_err();
            assert!(matches!(err, ProviderError::InvalidResponse(_)), "body: {body}");
        }
    }
}
