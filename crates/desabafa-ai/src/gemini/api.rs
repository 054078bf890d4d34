//! CompletionClient implementation for GeminiClient (one-shot + streaming).

use async_trait::async_trait;
use futures_util::{future, StreamExt};
use tracing::debug;

use crate::streaming::{response_events, SseEvent};
use crate::{AiError, CompletionClient, FragmentStream, Message};

use super::client::{stream_chunk_text, GeminiClient};

impl GeminiClient {
    async fn post(&self, url: &str, body: &serde_json::Value) -> Result<reqwest::Response, AiError> {
        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }
        Ok(response)
    }
}

/// Reduce one parsed SSE event to a reply fragment, dropping empty ones.
fn fragment_of(event: Result<SseEvent, AiError>) -> Option<Result<String, AiError>> {
    match event.and_then(|event| stream_chunk_text(&event.data)) {
        Ok(text) if text.is_empty() => None,
        other => Some(other),
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn create_stream(
        &self,
        history: &[Message],
        system_instruction: &str,
    ) -> Result<FragmentStream, AiError> {
        let body = self.build_request_body(history, system_instruction);
        let url = format!("{}?alt=sse", self.api_url(true));

        debug!(model = %self.config.model, turns = history.len(), "Gemini API streaming request");

        let response = self.post(&url, &body).await?;
        let fragments = response_events(response).filter_map(|event| future::ready(fragment_of(event)));
        Ok(Box::pin(fragments))
    }

    async fn complete(
        &self,
        history: &[Message],
        system_instruction: &str,
    ) -> Result<String, AiError> {
        let body = self.build_request_body(history, system_instruction);
        let url = self.api_url(false);

        debug!(model = %self.config.model, turns = history.len(), "Gemini API request");

        let response = self.post(&url, &body).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }
}
