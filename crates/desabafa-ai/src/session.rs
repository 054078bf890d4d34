//! Conversation session management.
//!
//! A `ChatSession` owns one transcript and at most one in-flight reply.
//! The reply is produced by a background task that only sends
//! `StreamEvent`s; the session applies them on its own schedule (`poll`,
//! `next_event`), discarding any event whose epoch is not its own.

mod chat;
mod manager;
mod types;


pub use chat::{ERROR_FALLBACK, UNAVAILABLE_NOTICE};
pub use manager::ChatSession;
pub use types::{ConversationPresenter, Epoch, SessionStatus, StreamEvent, StreamEventKind};
