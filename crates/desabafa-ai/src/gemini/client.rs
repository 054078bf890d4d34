//! Gemini API client struct, request building, and response parsing.

use std::time::Duration;

use tracing::warn;

use crate::{AiError, Message, Role};

use super::config::GeminiConfig;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    /// No overall request timeout: a stream may legitimately run long,
    /// and a stalled one is ended by reset.
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn api_url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        format!("{}/{}:{}", GEMINI_API_BASE, self.config.model, method)
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(
        &self,
        history: &[Message],
        system_instruction: &str,
    ) -> serde_json::Value {
        let contents: Vec<_> = history
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content }]
                })
            })
            .collect();

        serde_json::json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": system_instruction }]
            },
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        })
    }

    /// Parse a non-streaming `generateContent` response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, AiError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        let first = candidates
            .first()
            .ok_or_else(|| AiError::ParseError("empty candidates".to_string()))?;

        if let Some(reason) = first["finishReason"].as_str() {
            if reason != "STOP" && reason != "MAX_TOKENS" {
                warn!(reason, "Gemini candidate finished early");
            }
        }

        Ok(candidate_text(first))
    }
}

/// Text of one SSE payload: every text part of every candidate, in order.
///
/// A payload that is not JSON means the stream is malformed; an `error`
/// object is a remote failure reported mid-stream.
pub(crate) fn stream_chunk_text(data: &str) -> Result<String, AiError> {
    let json: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| AiError::ParseError(format!("malformed stream payload: {e}")))?;

    if let Some(error) = json.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Err(AiError::ApiError(message.to_string()));
    }

    let mut text = String::new();
    if let Some(candidates) = json["candidates"].as_array() {
        for candidate in candidates {
            text.push_str(&candidate_text(candidate));
        }
    }
    Ok(text)
}

fn candidate_text(candidate: &serde_json::Value) -> String {
    candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(GeminiConfig::new("test-key").with_max_tokens(256)).unwrap()
    }

    #[test]
    fn api_url_selects_method() {
        let client = client();
        assert!(client
            .api_url(true)
            .ends_with("/gemini-2.5-flash:streamGenerateContent"));
        assert!(client.api_url(false).ends_with("/gemini-2.5-flash:generateContent"));
    }

    #[test]
    fn request_body_maps_roles_and_instruction() {
        let history = vec![Message::user("hi"), Message::model("hello"), Message::user("sad")];
        let body = client().build_request_body(&history, "be kind");

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "sad");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be kind");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn chunk_text_concatenates_parts() {
        let data = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        assert_eq!(stream_chunk_text(data).unwrap(), "Hello");
    }

    #[test]
    fn chunk_without_text_is_empty() {
        let data = r#"{"candidates":[{"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":3}}"#;
        assert_eq!(stream_chunk_text(data).unwrap(), "");
    }

    #[test]
    fn chunk_malformed_json_is_parse_error() {
        assert!(matches!(
            stream_chunk_text("{not json"),
            Err(AiError::ParseError(_))
        ));
    }

    #[test]
    fn chunk_error_object_is_api_error() {
        let data = r#"{"error":{"code":500,"message":"internal"}}"#;
        match stream_chunk_text(data) {
            Err(AiError::ApiError(msg)) => assert_eq!(msg, "internal"),
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn parse_response_reads_first_candidate() {
        let json = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "Breathe in." }] }, "finishReason": "STOP" }]
        });
        assert_eq!(client().parse_response(json).unwrap(), "Breathe in.");
    }

    #[test]
    fn parse_response_without_candidates_fails() {
        let err = client().parse_response(serde_json::json!({})).unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }
}
