use std::path::Path;

use crate::params::ContextParams;
use crate::sampling::SamplingParams;
use crate::token::Token;

/// Backend-agnostic interface for inference engines.
///
/// The session driver never looks inside the model: it feeds tokens through
/// `evaluate`, asks `sample` for the next one, and uses the tokenizer hooks to
/// wrap user turns and render output.
pub trait LLMBackend {
    fn load<P: AsRef<Path>>(model_path: P, params: &ContextParams) -> Result<Self, String>
    where
        Self: Sized;

    /// Tokenize UTF-8 text. `add_bos` prepends the model's beginning-of-sequence token.
    fn tokenize(&self, text: &str, add_bos: bool) -> Result<Vec<Token>, String>;

    /// Advance model state by `tokens`, placed at position `n_past`.
    fn evaluate(&mut self, tokens: &[Token], n_past: i32) -> Result<(), String>;

    /// Draw the next token from the logits of the last evaluation.
    /// `repetition_context` is the lookback window used for the repeat penalty.
    fn sample(
        &mut self,
        n_past: i32,
        params: &SamplingParams,
        repetition_context: &[Token],
    ) -> Result<Token, String>;

    /// Decode a single token ID into a UTF-8 fragment.
    fn decode_token(&self, token: Token) -> Result<String, String>;

    /// Model’s EOS token.
    fn eos_token(&self) -> Token;

    // ========== OPTIONAL HOOKS ==========

    /// Mutable view of the logits produced by the last evaluation, if the
    /// backend exposes them.
    fn logits_mut(&mut self) -> Option<&mut [f32]> {
        None
    }

    /// Active context window (n_ctx) if known.
    fn context_window_hint(&self) -> Option<usize> {
        None
    }

    /// Free-form build/system description for the startup banner.
    fn system_info(&self) -> Option<String> {
        None
    }

    /// Decode a run of tokens by concatenating their fragments.
    fn detokenize(&self, tokens: &[Token]) -> Result<String, String> {
        let mut s = String::new();
        for tok in tokens {
            s.push_str(&self.decode_token(*tok)?);
        }
        Ok(s)
    }
}
