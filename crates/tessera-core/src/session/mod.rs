//! Instruct-mode session: one prompt, then alternating user turns and model output
//! over a bounded context window.

use std::io::Write;

use crate::antiprompt::{INSTRUCTION_ANTIPROMPT, ReversePrompts};
use crate::config::SessionConfig;
use crate::console::{Console, ConsoleState};
use crate::error::{Result, SessionError};
use crate::history::TokenHistory;
use crate::input::TurnSource;
use crate::interrupt::Interaction;
use crate::window::{ContextWindow, PROMPT_MARGIN};
use tessera_abi::backend::LLMBackend;
use tessera_abi::sampling::SamplingParams;
use tessera_abi::token::Token;

// Child modules (private to this crate). They can access private fields here.
mod banner;
mod prime;
mod sample;
mod turn;

/// Injected before every user turn.
pub const INSTRUCTION_PREFIX: &str = "\n\n### Instruction:\n\n";
/// Injected after every user turn.
pub const RESPONSE_SUFFIX: &str = "\n\n### Response:\n\n";

/// What the next tick will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Queued tokens remain; feed the next batch.
    Priming,
    /// Queue drained and nobody asked for a pause; draw one token.
    Sampling,
    /// Hand the terminal to the user.
    AwaitingUser,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Primed(usize),
    Sampled(Token),
    UserTurn { tokens: usize },
    /// A pause was requested before anything was evaluated; nothing to show yet.
    Skipped,
    /// Input stream closed.
    Finished,
    /// Ctrl-c at the user prompt.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    EndOfInput,
    /// The user asked to quit while it was their turn.
    Interrupted,
}

pub struct Session<B: LLMBackend, I: TurnSource, W: Write> {
    backend: B,
    sampling: SamplingParams,
    n_batch: usize,
    n_predict: i32,
    repeat_last_n: usize,
    ignore_eos: bool,
    input_prefix: String,
    reverse_prompts: ReversePrompts,

    // ========== transcript ==========
    prompt_tokens: Vec<Token>,
    inp_pfx: Vec<Token>,
    inp_sfx: Vec<Token>,
    queue: Vec<Token>,
    consumed: usize,

    history: TokenHistory,
    window: ContextWindow,
    remaining: i32,
    interaction: Interaction,
    /// False while replaying what the user just typed.
    echo: bool,

    input: I,
    console: Console<W>,
}

impl<B: LLMBackend, I: TurnSource, W: Write> Session<B, I, W> {
    /// Tokenize the prompt and instruction wrappers, and size the window.
    pub fn new(
        backend: B,
        cfg: &SessionConfig,
        interaction: Interaction,
        input: I,
        output: W,
    ) -> Result<Self> {
        cfg.validate()?;

        let n_ctx = backend.context_window_hint().unwrap_or(cfg.n_ctx);
        if n_ctx != cfg.n_ctx {
            tracing::warn!(
                "[session] backend reports n_ctx = {n_ctx} (requested {})",
                cfg.n_ctx
            );
        }

        // leading space matches the reference tokenizer's behavior
        let prompt = format!(" {}", cfg.prompt);
        let prompt_tokens = backend
            .tokenize(&prompt, true)
            .map_err(SessionError::Tokenize)?;
        if prompt_tokens.is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        let max = n_ctx.saturating_sub(PROMPT_MARGIN);
        if prompt_tokens.len() > max {
            return Err(SessionError::PromptTooLong {
                len: prompt_tokens.len(),
                max,
            });
        }

        // the whole prompt is the kept prefix in instruct mode
        let n_keep = prompt_tokens.len();
        let window = ContextWindow::new(n_ctx, n_keep);

        let n_batch = cfg.n_batch.min(window.max_batch());
        if n_batch < cfg.n_batch {
            tracing::warn!(
                "[session] n_batch clamped {} → {n_batch} (n_ctx = {n_ctx}, n_keep = {n_keep})",
                cfg.n_batch
            );
        }

        let inp_pfx = backend
            .tokenize(INSTRUCTION_PREFIX, true)
            .map_err(SessionError::Tokenize)?;
        let inp_sfx = backend
            .tokenize(RESPONSE_SUFFIX, false)
            .map_err(SessionError::Tokenize)?;

        let mut reverse_prompts = ReversePrompts::new(cfg.antiprompt.iter().cloned());
        reverse_prompts.push(INSTRUCTION_ANTIPROMPT);

        Ok(Self {
            backend,
            sampling: cfg.sampling_params(),
            n_batch,
            n_predict: cfg.n_predict,
            repeat_last_n: cfg.repeat_last_n.min(n_ctx),
            ignore_eos: cfg.ignore_eos,
            input_prefix: cfg.input_prefix.clone(),
            reverse_prompts,
            queue: prompt_tokens.clone(),
            prompt_tokens,
            inp_pfx,
            inp_sfx,
            consumed: 0,
            history: TokenHistory::new(n_ctx),
            window,
            remaining: cfg.n_predict,
            interaction,
            echo: true,
            input,
            console: Console::new(output, cfg.use_color),
        })
    }

    // ─────────────────────────────────────────────
    // State inspection
    // ─────────────────────────────────────────────

    /// Derive the phase from the queue cursor, the pause flag and `n_past`.
    pub fn phase(&self) -> Phase {
        let paused = self.interaction.is_interacting();
        let pending = self.consumed < self.queue.len();
        let prompt_done = self.consumed >= self.prompt_tokens.len();

        if paused && prompt_done && self.window.n_past() > 0 {
            Phase::AwaitingUser
        } else if pending {
            Phase::Priming
        } else if paused {
            Phase::AwaitingUser
        } else {
            Phase::Sampling
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn history(&self) -> &TokenHistory {
        &self.history
    }

    pub fn window(&self) -> &ContextWindow {
        &self.window
    }

    pub fn reverse_prompts(&self) -> &ReversePrompts {
        &self.reverse_prompts
    }

    pub fn prompt_tokens(&self) -> &[Token] {
        &self.prompt_tokens
    }

    /// Everything ever scheduled for evaluation.
    pub fn queue(&self) -> &[Token] {
        &self.queue
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn n_batch(&self) -> usize {
        self.n_batch
    }

    pub fn output(&self) -> &W {
        self.console.get_ref()
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Colour the console believes is active. Default whenever the model is
    /// generating, which is the only time ctrl-c resumes instead of exiting.
    pub fn console_state(&self) -> ConsoleState {
        self.console.state()
    }

    // ─────────────────────────────────────────────
    // Driving
    // ─────────────────────────────────────────────

    /// Run one tick of the loop.
    pub fn step(&mut self) -> Result<Step> {
        match self.phase() {
            Phase::Priming => self.prime(),
            Phase::Sampling => self.sample_next(),
            Phase::AwaitingUser => self.take_user_turn(),
        }
    }

    /// Loop until the input stream closes or the user quits at the prompt.
    /// Any error ends the session.
    pub fn run(&mut self) -> Result<SessionEnd> {
        // the first thing we output is the prompt
        self.console.set_state(ConsoleState::Prompt)?;

        let end = loop {
            match self.step()? {
                Step::Finished => break SessionEnd::EndOfInput,
                Step::Interrupted => break SessionEnd::Interrupted,
                _ => {}
            }
        };
        self.console.set_state(ConsoleState::Default)?;
        self.console.flush()?;
        Ok(end)
    }

    // ─────────────────────────────────────────────
    // Shared helpers for the tick handlers
    // ─────────────────────────────────────────────

    /// Evaluate `batch`, recomputing from the kept prefix if it would overflow.
    fn evaluate(&mut self, mut batch: Vec<Token>) -> Result<()> {
        if let Some(ev) = self.window.make_room(&mut batch, &self.history) {
            let text = self
                .backend
                .detokenize(&batch)
                .unwrap_or_else(|e| format!("<{e}>"));
            tracing::debug!(
                discarded = ev.discarded,
                reinjected = ev.reinjected,
                "[session] context full, resetting: '{text}'"
            );
        }

        let n_past = self.window.n_past();
        tracing::trace!("[session] evaluate {} tokens at n_past = {n_past}", batch.len());
        self.backend
            .evaluate(&batch, n_past as i32)
            .map_err(SessionError::Eval)?;
        self.window.commit(batch.len());
        Ok(())
    }

    fn echo_tokens(&mut self, tokens: &[Token]) -> Result<()> {
        for &t in tokens {
            let piece = self
                .backend
                .decode_token(t)
                .map_err(SessionError::Decode)?;
            self.console.print(&piece)?;
        }
        self.console.flush()?;
        Ok(())
    }

    #[inline]
    fn queue_drained(&self) -> bool {
        self.consumed >= self.queue.len()
    }

    /// Pause if the recent output ends with a reverse prompt.
    fn check_reverse_prompt(&mut self) -> Result<()> {
        if !self.queue_drained() {
            return Ok(());
        }

        let tail: Vec<Token> = self.history.iter().collect();
        let last_output = self
            .backend
            .detokenize(&tail)
            .map_err(SessionError::Decode)?;

        if let Some(hit) = self.reverse_prompts.find_suffix(&last_output) {
            tracing::debug!("[session] reverse prompt hit: {hit:?}");
            self.interaction.pause();
            self.console.set_state(ConsoleState::UserInput)?;
            self.console.flush()?;
        }
        Ok(())
    }

    /// Refill the per-turn budget and pause once it runs out. Only sampling
    /// calls this, so a long user turn is still evaluated in full.
    fn check_budget(&mut self) {
        if self.n_predict >= 0 && self.remaining <= 0 {
            tracing::debug!("[session] generation budget spent; returning control");
            self.remaining = self.n_predict;
            self.interaction.pause();
        }
    }
}
