use super::{Session, Step};
use crate::error::{Result, SessionError};
use crate::input::TurnSource;
use std::io::Write;
use tessera_abi::backend::LLMBackend;

impl<B: LLMBackend, I: TurnSource, W: Write> Session<B, I, W> {
    /// Draw one token, show it, and feed it back into the model.
    pub(super) fn sample_next(&mut self) -> Result<Step> {
        let eos = self.backend.eos_token();

        if self.ignore_eos {
            if let Some(logit) = self
                .backend
                .logits_mut()
                .and_then(|logits| logits.get_mut(eos.0 as usize))
            {
                *logit = 0.0;
            }
        }

        let repetition_context = self.history.tail(self.repeat_last_n);
        let token = self
            .backend
            .sample(
                self.window.n_past() as i32,
                &self.sampling,
                &repetition_context,
            )
            .map_err(SessionError::Sample)?;
        tracing::trace!("[session] sampled {token}");

        self.history.push(token);
        self.remaining -= 1;

        self.echo = true;
        self.echo_tokens(&[token])?;
        self.evaluate(vec![token])?;

        if token == eos {
            tracing::debug!("[session] end of text; returning control");
            self.interaction.pause();
        }
        self.check_budget();
        self.check_reverse_prompt()?;

        Ok(Step::Sampled(token))
    }
}
