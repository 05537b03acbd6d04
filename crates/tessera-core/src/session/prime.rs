use super::{Session, Step};
use crate::console::ConsoleState;
use crate::error::Result;
use crate::input::TurnSource;
use std::io::Write;
use tessera_abi::backend::LLMBackend;
use tessera_abi::token::Token;

impl<B: LLMBackend, I: TurnSource, W: Write> Session<B, I, W> {
    /// Feed up to `n_batch` queued tokens through the model.
    pub(super) fn prime(&mut self) -> Result<Step> {
        let end = (self.consumed + self.n_batch).min(self.queue.len());
        let batch: Vec<Token> = self.queue[self.consumed..end].to_vec();
        self.history.extend(batch.iter().copied());
        self.consumed = end;

        if self.echo {
            self.echo_tokens(&batch)?;
            if self.queue_drained() {
                self.console.set_state(ConsoleState::Default)?;
            }
        }

        let n = batch.len();
        tracing::debug!(
            "[session] priming {n} tokens ({}/{} consumed)",
            self.consumed,
            self.queue.len()
        );
        self.evaluate(batch)?;

        self.check_reverse_prompt()?;
        Ok(Step::Primed(n))
    }
}
