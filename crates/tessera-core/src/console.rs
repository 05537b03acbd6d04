//! Output colouring: the prompt, the model's text and the user's typing each
//! get their own colour, emitted only when the state changes.

use std::io::{self, Write};

pub const ANSI_COLOR_RESET: &str = "\x1b[0m";
const ANSI_COLOR_YELLOW: &str = "\x1b[33m";
const ANSI_BOLD_GREEN: &str = "\x1b[1m\x1b[32m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    Default,
    Prompt,
    UserInput,
}

impl ConsoleState {
    fn code(self) -> &'static str {
        match self {
            ConsoleState::Default => ANSI_COLOR_RESET,
            ConsoleState::Prompt => ANSI_COLOR_YELLOW,
            ConsoleState::UserInput => ANSI_BOLD_GREEN,
        }
    }
}

/// Writer wrapper that owns the generated-text stream.
pub struct Console<W: Write> {
    out: W,
    use_color: bool,
    state: ConsoleState,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            state: ConsoleState::Default,
        }
    }

    #[inline]
    pub fn state(&self) -> ConsoleState {
        self.state
    }

    pub fn set_state(&mut self, next: ConsoleState) -> io::Result<()> {
        if !self.use_color || next == self.state {
            return Ok(());
        }
        self.state = next;
        self.out.write_all(next.code().as_bytes())
    }

    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
