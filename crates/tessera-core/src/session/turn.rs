use super::{Session, Step};
use crate::console::ConsoleState;
use crate::error::{Result, SessionError};
use crate::input::{TurnRead, TurnSource};
use std::io::Write;
use tessera_abi::backend::LLMBackend;

impl<B: LLMBackend, I: TurnSource, W: Write> Session<B, I, W> {
    /// Block on one user turn and queue it, wrapped in the instruction template.
    pub(super) fn take_user_turn(&mut self) -> Result<Step> {
        if self.window.n_past() == 0 {
            // nothing evaluated yet, so nothing to show the user
            return Ok(Step::Skipped);
        }

        // consume, consume
        self.consumed = self.queue.len();

        let marker = format!("> {}", self.input_prefix);
        self.console.set_state(ConsoleState::UserInput)?;
        self.console.print("\n")?;
        if !self.input.draws_prompt() {
            self.console.print(&marker)?;
        }
        self.console.flush()?;

        let buffer = match self.input.next_turn(&marker, &self.input_prefix)? {
            TurnRead::Line(buffer) => buffer,
            TurnRead::Closed => {
                tracing::debug!("[session] input closed");
                return Ok(Step::Finished);
            }
            TurnRead::Interrupted => {
                tracing::debug!("[session] interrupted at the prompt");
                return Ok(Step::Interrupted);
            }
        };

        self.console.set_state(ConsoleState::Default)?;

        let mut added = 0;
        // a bare newline adds nothing
        if buffer.len() > 1 {
            let line = self
                .backend
                .tokenize(&buffer, false)
                .map_err(SessionError::Tokenize)?;

            self.queue.extend_from_slice(&self.inp_pfx);
            self.queue.extend_from_slice(&line);
            self.queue.extend_from_slice(&self.inp_sfx);

            // counts against the budget, but the turn is always evaluated
            added = line.len();
            self.remaining -= added as i32;
        }

        // do not echo this again
        self.echo = false;
        self.interaction.resume();

        tracing::debug!("[session] user turn: {added} tokens");
        Ok(Step::UserTurn { tokens: added })
    }
}
