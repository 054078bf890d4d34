//! Chat engine for Desabafa.
//!
//! Provides:
//! - `ChatSession`: one conversation, single request in flight, streamed
//!   replies applied fragment by fragment, generation-tagged so a reset
//!   session never sees a stale stream
//! - `CompletionClient`: the seam to the remote model, with a Gemini
//!   implementation speaking SSE
//! - Language tables, translations, and the support persona prompt
//! - One-shot tip articles

pub mod gemini;
pub mod language;
pub mod session;
pub mod streaming;
pub mod tips;
pub mod transcript;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

pub use gemini::{GeminiClient, GeminiConfig};
pub use language::{language_name, resolve_language, system_instruction, t, Language, LANGUAGES};
pub use session::{
    ChatSession, ConversationPresenter, Epoch, SessionStatus, StreamEvent, StreamEventKind,
};
pub use transcript::{Transcript, Turn, TurnKind};

/// Lazily produced reply text, in generation order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, AiError>> + Send>>;

/// A hosted generative model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Open a streamed completion over `history` (oldest first).
    async fn create_stream(
        &self,
        history: &[Message],
        system_instruction: &str,
    ) -> Result<FragmentStream, AiError>;

    /// Generate a whole reply in one call.
    async fn complete(
        &self,
        history: &[Message],
        system_instruction: &str,
    ) -> Result<String, AiError>;
}

/// A role/content pair as sent to the remote model.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl From<AiError> for desabafa_common::DesabafaError {
    fn from(err: AiError) -> Self {
        desabafa_common::DesabafaError::Ai(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let msg = Message::model("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"model","content":"hi"}"#);
    }

    #[test]
    fn ai_error_converts_to_app_error() {
        let err: desabafa_common::DesabafaError = AiError::RateLimited.into();
        assert_eq!(err.to_string(), "ai error: Rate limited");
    }
}
