//! Terminal rendering of a conversation.
//!
//! The session re-renders after every change; this presenter only writes
//! what is new since the previous render, so a streaming reply shows up
//! as it arrives instead of being reprinted.

use std::io::{self, Write};

use desabafa_ai::{ConversationPresenter, Epoch, Role, SessionStatus, Transcript, TurnKind};

use crate::console::Console;

const LABEL: &str = "desabafa";

pub struct TerminalPresenter<W> {
    console: Console<W>,
    /// Session last rendered; a different one means a reset.
    epoch: Option<Epoch>,
    /// Turns fully written.
    done: usize,
    /// Some of turn `done` has been written.
    started: bool,
    /// Bytes of turn `done` already written.
    written: usize,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(console: Console<W>) -> Self {
        Self {
            console,
            epoch: None,
            done: 0,
            started: false,
            written: 0,
        }
    }

    fn draw(&mut self, epoch: Epoch, transcript: &Transcript) -> io::Result<()> {
        let mut screen = self.console.lock();

        if self.epoch != Some(epoch) {
            if self.epoch.is_some() {
                screen.end_line()?;
                writeln!(screen.out)?;
            }
            self.epoch = Some(epoch);
            self.done = 0;
            self.started = false;
            self.written = 0;
        }
        if transcript.is_empty() {
            return screen.out.flush();
        }

        while let Some(turn) = transcript.turns().get(self.done) {
            // Typed by the user; already on screen.
            if turn.role() == Role::User {
                self.done += 1;
                continue;
            }

            // The streaming reply was replaced by an error notice.
            if self.started && turn.kind() == TurnKind::Notice {
                if self.written > 0 {
                    screen.end_line()?;
                }
                self.started = false;
                self.written = 0;
            }

            // Opens a new line after the REPL broke this one.
            if !screen.line_open {
                write!(screen.out, "{LABEL}> ")?;
                screen.line_open = true;
            }
            self.started = true;

            let content = turn.content();
            write!(screen.out, "{}", content.get(self.written..).unwrap_or(""))?;
            self.written = content.len();

            if turn.is_streaming() {
                break;
            }
            screen.end_line()?;
            self.started = false;
            self.written = 0;
            self.done += 1;
        }

        screen.out.flush()
    }
}

impl<W: Write> ConversationPresenter for TerminalPresenter<W> {
    fn render(&mut self, epoch: Epoch, transcript: &Transcript, _status: SessionStatus) {
        if let Err(e) = self.draw(epoch, transcript) {
            tracing::debug!("Terminal write failed: {e}");
        }
    }
}
