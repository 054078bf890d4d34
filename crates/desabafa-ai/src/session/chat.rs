//! Submitting user turns and running the reply stream.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

use crate::language::{language_name, system_instruction};
use crate::transcript::Turn;
use crate::{CompletionClient, Message, Role};

use super::manager::ChatSession;
use super::types::{Epoch, InFlight, SessionStatus, StreamEvent};

/// Shown in place of a reply whose request failed.
pub const ERROR_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

/// Shown instead of the greeting when no API key is configured.
pub const UNAVAILABLE_NOTICE: &str =
    "Chatbot is currently unavailable. Please check API key configuration.";

impl ChatSession {
    /// Send a user turn and start streaming the reply.
    ///
    /// Ignored (returns `false`, nothing changes) when the text is blank,
    /// a reply is still streaming, or no backend is configured. Must be
    /// called from within a Tokio runtime.
    pub fn submit(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.trim().is_empty() {
            return false;
        }
        if self.status == SessionStatus::AwaitingResponse {
            debug!(session = %self.id.short(), "Reply in progress, dropping submission");
            return false;
        }
        let Some(client) = self.client.clone() else {
            return false;
        };

        self.transcript.push(Turn::message(Role::User, text));
        self.status = SessionStatus::AwaitingResponse;
        let history = self.transcript.history();
        self.transcript.push(Turn::placeholder());
        self.notify();

        let instruction = system_instruction(language_name(&self.language));
        debug!(
            session = %self.id.short(),
            epoch = %self.epoch,
            turns = history.len(),
            "Submitting chat request"
        );

        let task = tokio::spawn(stream_reply(
            client,
            history,
            instruction,
            self.epoch,
            self.events_tx.clone(),
        ));
        self.in_flight = Some(InFlight::new(task));
        true
    }
}

/// Forward one streamed reply as events tagged with `epoch`.
///
/// Always ends with exactly one `End` or `Error`, unless the receiving
/// side is gone.
async fn stream_reply(
    client: Arc<dyn CompletionClient>,
    history: Vec<Message>,
    instruction: String,
    epoch: Epoch,
    events: mpsc::UnboundedSender<StreamEvent>,
) {
    let mut fragments = match client.create_stream(&history, &instruction).await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = events.send(StreamEvent::error(epoch, e.to_string()));
            return;
        }
    };

    while let Some(item) = fragments.next().await {
        let event = match item {
            Ok(text) => StreamEvent::fragment(epoch, text),
            Err(e) => {
                let _ = events.send(StreamEvent::error(epoch, e.to_string()));
                return;
            }
        };
        if events.send(event).is_err() {
            return;
        }
    }

    let _ = events.send(StreamEvent::end(epoch));
}
