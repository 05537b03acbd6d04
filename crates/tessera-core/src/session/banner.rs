use super::Session;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::input::TurnSource;
use std::fmt::Write as _;
use std::io::Write;
use tessera_abi::backend::LLMBackend;

impl<B: LLMBackend, I: TurnSource, W: Write> Session<B, I, W> {
    /// Startup text for the diagnostic stream: prompt dump (if verbose),
    /// reverse prompts, sampling and window parameters, and usage help.
    pub fn banner(&self, cfg: &SessionConfig) -> Result<String> {
        let mut s = String::new();

        if cfg.verbose_prompt {
            let _ = writeln!(s);
            let _ = writeln!(s, "prompt: ' {}'", cfg.prompt);
            let _ = writeln!(
                s,
                "number of tokens in prompt = {}",
                self.prompt_tokens.len()
            );
            for &t in &self.prompt_tokens {
                let piece = self
                    .backend
                    .decode_token(t)
                    .map_err(SessionError::Decode)?;
                let _ = writeln!(s, "{:>6} -> '{piece}'", t.0);
            }
            let kept = self
                .backend
                .detokenize(&self.prompt_tokens[..self.window.n_keep()])
                .map_err(SessionError::Decode)?;
            let _ = writeln!(s, "static prompt based on n_keep: '{kept}'");
            let _ = writeln!(s);
        }

        let _ = writeln!(s, "interactive mode on.");
        for rp in self.reverse_prompts.as_slice() {
            let _ = writeln!(s, "Reverse prompt: '{rp}'");
        }
        if !self.input_prefix.is_empty() {
            let _ = writeln!(s, "Input prefix: '{}'", self.input_prefix);
        }

        let _ = writeln!(
            s,
            "sampling: temp = {:.6}, top_k = {}, top_p = {:.6}, repeat_last_n = {}, repeat_penalty = {:.6}",
            cfg.temp, cfg.top_k, cfg.top_p, self.repeat_last_n, cfg.repeat_penalty
        );
        let _ = writeln!(
            s,
            "generate: n_ctx = {}, n_batch = {}, n_predict = {}, n_keep = {}",
            self.window.n_ctx(),
            self.n_batch,
            self.n_predict,
            self.window.n_keep()
        );
        let _ = writeln!(s);
        let _ = writeln!(s);

        let _ = writeln!(s, "== Running in interactive mode. ==");
        let _ = writeln!(s, " - Press Ctrl+C to interject at any time.");
        let _ = writeln!(s, " - Press Return to return control to the model.");
        let _ = writeln!(
            s,
            " - If you want to submit another line, end your input in '\\'."
        );
        let _ = writeln!(s);

        Ok(s)
    }
}
