//! Session types, stream events, and the in-flight task guard.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::transcript::Transcript;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Idle,
    AwaitingResponse,
}

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Generation tag of one `ChatSession` instance.
///
/// Unique per process; a reset session always gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Epoch(u64);

impl Epoch {
    pub(crate) fn next() -> Self {
        Self(NEXT_EPOCH.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEventKind {
    /// A piece of reply text.
    Fragment(String),
    /// The reply is complete.
    End,
    /// The request failed; the message is for logs only.
    Error(String),
}

/// Something that happened to the stream opened by session `epoch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub epoch: Epoch,
    pub kind: StreamEventKind,
}

impl StreamEvent {
    pub fn fragment(epoch: Epoch, text: impl Into<String>) -> Self {
        Self {
            epoch,
            kind: StreamEventKind::Fragment(text.into()),
        }
    }

    pub fn end(epoch: Epoch) -> Self {
        Self {
            epoch,
            kind: StreamEventKind::End,
        }
    }

    pub fn error(epoch: Epoch, message: impl Into<String>) -> Self {
        Self {
            epoch,
            kind: StreamEventKind::Error(message.into()),
        }
    }
}

/// Renders a session. Called synchronously after every mutation.
///
/// `epoch` identifies the session instance: a new one after a reset means
/// the transcript started over.
pub trait ConversationPresenter {
    fn render(&mut self, epoch: Epoch, transcript: &Transcript, status: SessionStatus);
}

impl<F> ConversationPresenter for F
where
    F: FnMut(Epoch, &Transcript, SessionStatus),
{
    fn render(&mut self, epoch: Epoch, transcript: &Transcript, status: SessionStatus) {
        self(epoch, transcript, status)
    }
}

/// Aborts the streaming task on drop, so a reset or dropped session never
/// leaves a request running behind it.
pub(crate) struct InFlight {
    handle: JoinHandle<()>,
}

impl InFlight {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
