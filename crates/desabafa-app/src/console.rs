//! Stdout shared between the presenter and the REPL.
//!
//! A streaming reply leaves its line open between fragments. Anything the
//! REPL prints in that window ends the line first; the presenter picks up
//! where it was on a fresh one.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct Screen<W> {
    pub out: W,
    /// A reply line was started and not yet ended.
    pub line_open: bool,
}

impl<W: Write> Screen<W> {
    pub fn end_line(&mut self) -> io::Result<()> {
        if self.line_open {
            writeln!(self.out)?;
            self.line_open = false;
        }
        Ok(())
    }
}

pub struct Console<W> {
    screen: Arc<Mutex<Screen<W>>>,
}

impl<W> Clone for Console<W> {
    fn clone(&self) -> Self {
        Self {
            screen: Arc::clone(&self.screen),
        }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen {
                out,
                line_open: false,
            })),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Screen<W>> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Print `text` on lines of its own.
    pub fn say(&self, text: &str) -> io::Result<()> {
        let mut screen = self.lock();
        screen.end_line()?;
        screen.out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(screen.out)?;
        }
        screen.out.flush()
    }

    /// Print whatever `write` produces, as with `say`.
    pub fn say_with(&self, write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> io::Result<()> {
        let mut buf = Vec::new();
        write(&mut buf)?;
        self.say(&String::from_utf8_lossy(&buf))
    }
}
