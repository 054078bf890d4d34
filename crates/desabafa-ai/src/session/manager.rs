//! ChatSession struct, construction, reset, and event application.

use std::sync::Arc;

use desabafa_common::SessionId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::language::t;
use crate::transcript::{Transcript, Turn};
use crate::{CompletionClient, Role};

use super::chat::{ERROR_FALLBACK, UNAVAILABLE_NOTICE};
use super::types::{
    ConversationPresenter, Epoch, InFlight, SessionStatus, StreamEvent, StreamEventKind,
};

/// One conversation with the remote model.
pub struct ChatSession {
    pub(super) id: SessionId,
    pub(super) epoch: Epoch,
    pub(super) language: String,
    pub(super) transcript: Transcript,
    pub(super) status: SessionStatus,
    /// `None` when no credential was available at startup.
    pub(super) client: Option<Arc<dyn CompletionClient>>,
    pub(super) presenter: Option<Box<dyn ConversationPresenter + Send>>,
    /// Shared with every session this one is reset into, so late events
    /// from a superseded stream land here and get rejected by epoch.
    pub(super) events_tx: mpsc::UnboundedSender<StreamEvent>,
    pub(super) events_rx: mpsc::UnboundedReceiver<StreamEvent>,
    pub(super) in_flight: Option<InFlight>,
}

impl ChatSession {
    /// Start a conversation in `language`.
    ///
    /// With a client the transcript opens with the greeting; without one
    /// it opens with the unavailable notice and never accepts input.
    pub fn new(language: impl Into<String>, client: Option<Arc<dyn CompletionClient>>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self::seeded(language.into(), client, None, events_tx, events_rx)
    }

    fn seeded(
        language: String,
        client: Option<Arc<dyn CompletionClient>>,
        presenter: Option<Box<dyn ConversationPresenter + Send>>,
        events_tx: mpsc::UnboundedSender<StreamEvent>,
        events_rx: mpsc::UnboundedReceiver<StreamEvent>,
    ) -> Self {
        let mut transcript = Transcript::new();
        let seed = match client {
            Some(_) => t("welcome_message", &language),
            None => UNAVAILABLE_NOTICE,
        };
        transcript.push(Turn::notice(Role::Model, seed));

        let mut session = Self {
            id: SessionId::new(),
            epoch: Epoch::next(),
            language,
            transcript,
            status: SessionStatus::Idle,
            client,
            presenter,
            events_tx,
            events_rx,
            in_flight: None,
        };

        if session.client.is_none() {
            warn!(session = %session.id.short(), "Chat backend not configured, input disabled");
        }
        debug!(
            session = %session.id.short(),
            epoch = %session.epoch,
            language = %session.language,
            "Chat session started"
        );
        session.notify();
        session
    }

    /// Attach the presenter and render the current state into it.
    pub fn with_presenter(mut self, presenter: Box<dyn ConversationPresenter + Send>) -> Self {
        self.presenter = Some(presenter);
        self.notify();
        self
    }

    /// Replace this session with a fresh one in `language`.
    ///
    /// The in-flight request, if any, is aborted. Events it already queued
    /// carry the old epoch and are ignored by the new session.
    pub fn reset(self, language: impl Into<String>) -> ChatSession {
        let ChatSession {
            id,
            epoch,
            status,
            client,
            presenter,
            events_tx,
            events_rx,
            in_flight,
            ..
        } = self;
        drop(in_flight);

        let language = language.into();
        info!(
            session = %id.short(),
            old_epoch = %epoch,
            interrupted = status == SessionStatus::AwaitingResponse,
            language = %language,
            "Chat session reset"
        );
        Self::seeded(language, client, presenter, events_tx, events_rx)
    }

    /// Apply one stream event. Returns whether the transcript changed.
    pub fn apply(&mut self, event: StreamEvent) -> bool {
        if event.epoch != self.epoch {
            debug!(
                session = %self.id.short(),
                stale = %event.epoch,
                current = %self.epoch,
                "Discarding event from superseded stream"
            );
            return false;
        }
        if self.status != SessionStatus::AwaitingResponse {
            debug!(session = %self.id.short(), "Discarding event with no request in flight");
            return false;
        }

        match event.kind {
            StreamEventKind::Fragment(text) => {
                if !self.transcript.append_to_last(&text) {
                    return false;
                }
            }
            StreamEventKind::End => {
                self.transcript.finish_last();
                self.finish_request();
                debug!(session = %self.id.short(), "Reply complete");
            }
            StreamEventKind::Error(message) => {
                warn!(session = %self.id.short(), error = %message, "Chat stream failed");
                self.transcript
                    .replace_last(Turn::notice(Role::Model, ERROR_FALLBACK));
                self.finish_request();
            }
        }

        self.notify();
        true
    }

    pub fn on_fragment(&mut self, epoch: Epoch, text: impl Into<String>) -> bool {
        self.apply(StreamEvent::fragment(epoch, text))
    }

    pub fn on_end(&mut self, epoch: Epoch) -> bool {
        self.apply(StreamEvent::end(epoch))
    }

    pub fn on_error(&mut self, epoch: Epoch, message: impl Into<String>) -> bool {
        self.apply(StreamEvent::error(epoch, message))
    }

    /// Apply every queued event without waiting. Returns how many changed
    /// the transcript.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next queued event and apply it.
    ///
    /// Returns `false` only if the channel closed, which cannot happen
    /// while the session holds its own sender.
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply events until the current reply ends one way or the other.
    ///
    /// There is no timeout: a stalled remote call keeps this waiting.
    pub async fn wait_idle(&mut self) {
        while self.status == SessionStatus::AwaitingResponse {
            if !self.next_event().await {
                break;
            }
        }
    }

    fn finish_request(&mut self) {
        self.status = SessionStatus::Idle;
        self.in_flight = None;
    }

    pub(super) fn notify(&mut self) {
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.render(self.epoch, &self.transcript, self.status);
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Whether a backend is configured and input is accepted at all.
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }
}
