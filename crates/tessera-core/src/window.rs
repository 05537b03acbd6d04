//! Context window bookkeeping: when the next batch would overflow `n_ctx`,
//! fall back to the kept prompt prefix and recompute half of the recent history.

use crate::history::TokenHistory;
use tessera_abi::token::Token;

/// Tokens between the prompt and the end of the window that must stay free.
pub const PROMPT_MARGIN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    n_ctx: usize,
    n_keep: usize,
    n_past: usize,
}

/// What a single recompute pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    /// Evaluated positions dropped beyond the kept prefix.
    pub discarded: usize,
    /// History tokens prepended to the batch for recompute.
    pub reinjected: usize,
}

impl ContextWindow {
    /// Callers validate `n_keep + PROMPT_MARGIN <= n_ctx` before constructing.
    pub fn new(n_ctx: usize, n_keep: usize) -> Self {
        debug_assert!(n_keep <= n_ctx);
        Self {
            n_ctx,
            n_keep,
            n_past: 0,
        }
    }

    #[inline]
    pub fn n_ctx(&self) -> usize {
        self.n_ctx
    }

    #[inline]
    pub fn n_keep(&self) -> usize {
        self.n_keep
    }

    /// Tokens the model currently holds in context.
    #[inline]
    pub fn n_past(&self) -> usize {
        self.n_past
    }

    /// Largest batch that keeps `n_past + batch <= n_ctx` after any recompute.
    pub fn max_batch(&self) -> usize {
        ((self.n_ctx - self.n_keep) / 2).max(1)
    }

    /// Ensure `batch` fits in the window, splicing recent history in front of it
    /// when it doesn't. `history` must already contain the batch tokens as its
    /// newest entries.
    pub fn make_room(&mut self, batch: &mut Vec<Token>, history: &TokenHistory) -> Option<Eviction> {
        if batch.is_empty() || self.n_past + batch.len() <= self.n_ctx {
            return None;
        }

        let n_left = self.n_past.saturating_sub(self.n_keep);
        self.n_past = self.n_keep;

        let recent = history.window(n_left / 2, batch.len());
        let reinjected = recent.len();
        batch.splice(0..0, recent);

        Some(Eviction {
            discarded: n_left,
            reinjected,
        })
    }

    /// Record a successful evaluation of `n` tokens.
    pub fn commit(&mut self, n: usize) {
        self.n_past += n;
    }
}
