//! Turns and the ordered transcript that holds them.
//!
//! Readers get the whole crate-external API; only the owning session
//! (inside this crate) can mutate. The last turn is the only one that can
//! still change, and only while it is streaming.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Message, Role};

/// Whether a turn belongs to the conversation proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    /// Exchanged with the model; part of the request history.
    Message,
    /// Shown to the user only: greetings, availability and error notices.
    Notice,
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
    kind: TurnKind,
    streaming: bool,
}

impl Turn {
    pub fn message(role: Role, content: impl Into<String>) -> Self {
        Self::build(role, content.into(), TurnKind::Message, false)
    }

    pub fn notice(role: Role, content: impl Into<String>) -> Self {
        Self::build(role, content.into(), TurnKind::Notice, false)
    }

    /// Empty model turn that fragments are appended to.
    pub(crate) fn placeholder() -> Self {
        Self::build(Role::Model, String::new(), TurnKind::Message, true)
    }

    fn build(role: Role, content: String, kind: TurnKind, streaming: bool) -> Self {
        Self {
            role,
            content,
            created_at: Utc::now(),
            kind,
            streaming,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> TurnKind {
        self.kind
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn is_empty_reply(&self) -> bool {
        self.role == Role::Model && !self.streaming && self.content.is_empty()
    }

    /// Notices and empty replies: nothing the model can be shown as an answer.
    fn is_unusable_reply(&self) -> bool {
        self.kind == TurnKind::Notice || self.is_empty_reply()
    }
}

/// Chronological sequence of turns for one conversation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Request history: exchanged turns only, oldest first.
    ///
    /// A model reply that finished with no text is left out, and so is
    /// the user turn before it or before a notice (its request failed):
    /// the model never answered either one.
    pub fn history(&self) -> Vec<Message> {
        let turns = &self.turns;
        turns
            .iter()
            .enumerate()
            .filter(|(i, turn)| {
                let unanswered = turn.role == Role::User
                    && turns.get(i + 1).is_some_and(Turn::is_unusable_reply);
                turn.kind == TurnKind::Message
                    && !turn.streaming
                    && !turn.is_empty_reply()
                    && !unanswered
            })
            .map(|(_, turn)| Message {
                role: turn.role,
                content: turn.content.clone(),
            })
            .collect()
    }

    /// Append a turn. A still-streaming last turn is frozen first.
    pub(crate) fn push(&mut self, turn: Turn) {
        self.finish_last();
        self.turns.push(turn);
    }

    /// Concatenate onto the last turn. Returns `false` when the last turn
    /// is frozen (or there is none) and nothing changed.
    pub(crate) fn append_to_last(&mut self, fragment: &str) -> bool {
        match self.turns.last_mut() {
            Some(turn) if turn.streaming => {
                turn.content.push_str(fragment);
                true
            }
            _ => false,
        }
    }

    /// Swap the last turn for `turn`, returning the one removed.
    pub(crate) fn replace_last(&mut self, turn: Turn) -> Option<Turn> {
        let previous = self.turns.pop();
        self.turns.push(turn);
        previous
    }

    pub(crate) fn finish_last(&mut self) {
        if let Some(turn) = self.turns.last_mut() {
            turn.streaming = false;
        }
    }
}
