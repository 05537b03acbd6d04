//! Fixed-capacity ring of the most recent tokens the model has seen.
//! Doubles as the repetition-penalty lookback and the source for context recompute.

use std::collections::VecDeque;
use tessera_abi::token::Token;

#[derive(Debug, Clone)]
pub struct TokenHistory {
    ring: VecDeque<Token>,
    capacity: usize,
}

impl TokenHistory {
    /// A full ring of `capacity` filler tokens.
    pub fn new(capacity: usize) -> Self {
        let mut ring = VecDeque::with_capacity(capacity);
        ring.resize(capacity, Token::NULL);
        Self { ring, capacity }
    }

    /// Always equal to `capacity`.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Append `token` as the newest entry and drop the oldest.
    pub fn push(&mut self, token: Token) {
        if self.capacity == 0 {
            return;
        }
        self.ring.pop_front();
        self.ring.push_back(token);
    }

    pub fn extend<I: IntoIterator<Item = Token>>(&mut self, tokens: I) {
        for t in tokens {
            self.push(t);
        }
    }

    /// Oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = Token> + '_ {
        self.ring.iter().copied()
    }

    /// The newest `n` tokens in order; `n` is clamped to capacity.
    pub fn tail(&self, n: usize) -> Vec<Token> {
        self.window(n, 0)
    }

    /// `count` tokens ending just before the newest `skip` tokens, in order.
    /// Both are clamped so the slice never leaves the ring.
    pub fn window(&self, count: usize, skip: usize) -> Vec<Token> {
        let end = self.capacity.saturating_sub(skip);
        let start = end.saturating_sub(count);
        self.ring.range(start..end).copied().collect()
    }

    #[inline]
    pub fn newest(&self) -> Option<Token> {
        self.ring.back().copied()
    }
}
