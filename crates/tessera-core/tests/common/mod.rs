//! Scripted byte-level backend for driving sessions without a model.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::path::Path;

use tessera_abi::backend::LLMBackend;
use tessera_abi::params::ContextParams;
use tessera_abi::sampling::SamplingParams;
use tessera_abi::token::Token;
use tessera_core::{Interaction, LineInput, Session, SessionConfig, TurnRead, TurnSource};

pub const BOS: Token = Token(1);
pub const EOS: Token = Token(2);
const BYTE_OFFSET: i32 = 10;

/// Every byte is one token; ids 0..10 are specials that decode to "".
#[derive(Debug, Default)]
pub struct MockBackend {
    pub script: VecDeque<Token>,
    pub fallback: Option<Token>,
    pub evals: Vec<(Vec<Token>, i32)>,
    pub sample_contexts: Vec<Vec<Token>>,
    pub logits: Vec<f32>,
    pub fail_eval_at: Option<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            logits: vec![1.0; 256 + BYTE_OFFSET as usize],
            ..Default::default()
        }
    }

    /// Sampler will emit `text` byte by byte, then `x` forever.
    pub fn scripted(text: &str) -> Self {
        let mut b = Self::new();
        b.script = bytes(text).into();
        b.fallback = Some(byte(b'x'));
        b
    }

    /// Every evaluated token, in order.
    pub fn evaluated(&self) -> Vec<Token> {
        self.evals.iter().flat_map(|(t, _)| t.iter().copied()).collect()
    }
}

pub fn byte(b: u8) -> Token {
    Token(b as i32 + BYTE_OFFSET)
}

pub fn bytes(text: &str) -> Vec<Token> {
    text.bytes().map(byte).collect()
}

impl LLMBackend for MockBackend {
    fn load<P: AsRef<Path>>(_model_path: P, _params: &ContextParams) -> Result<Self, String> {
        Ok(Self::new())
    }

    fn tokenize(&self, text: &str, add_bos: bool) -> Result<Vec<Token>, String> {
        let mut out = Vec::new();
        if add_bos {
            out.push(BOS);
        }
        out.extend(bytes(text));
        Ok(out)
    }

    fn evaluate(&mut self, tokens: &[Token], n_past: i32) -> Result<(), String> {
        if self.fail_eval_at == Some(self.evals.len()) {
            return Err("device lost".into());
        }
        self.evals.push((tokens.to_vec(), n_past));
        Ok(())
    }

    fn sample(
        &mut self,
        _n_past: i32,
        _params: &SamplingParams,
        repetition_context: &[Token],
    ) -> Result<Token, String> {
        self.sample_contexts.push(repetition_context.to_vec());
        self.script
            .pop_front()
            .or(self.fallback)
            .ok_or_else(|| "script exhausted".to_string())
    }

    fn decode_token(&self, token: Token) -> Result<String, String> {
        if token.0 < BYTE_OFFSET {
            return Ok(String::new());
        }
        Ok(((token.0 - BYTE_OFFSET) as u8 as char).to_string())
    }

    fn eos_token(&self) -> Token {
        EOS
    }

    fn logits_mut(&mut self) -> Option<&mut [f32]> {
        Some(&mut self.logits)
    }
}

pub type TestSession = Session<MockBackend, LineInput<Cursor<Vec<u8>>>, Vec<u8>>;

/// Stands in for a line editor: draws its own prompt and replays canned reads.
#[derive(Debug, Default)]
pub struct ScriptedTurns {
    pub reads: VecDeque<TurnRead>,
    pub prompts: Vec<String>,
}

impl ScriptedTurns {
    pub fn new(reads: impl IntoIterator<Item = TurnRead>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
            prompts: Vec::new(),
        }
    }
}

impl TurnSource for ScriptedTurns {
    fn draws_prompt(&self) -> bool {
        true
    }

    fn next_turn(&mut self, prompt: &str, _prefix: &str) -> std::io::Result<TurnRead> {
        self.prompts.push(prompt.to_string());
        Ok(self.reads.pop_front().unwrap_or(TurnRead::Closed))
    }
}

pub fn config(prompt: &str) -> SessionConfig {
    SessionConfig {
        prompt: prompt.to_string(),
        seed: 1,
        ..Default::default()
    }
}

pub fn session(cfg: &SessionConfig, backend: MockBackend, input: impl AsRef<[u8]>) -> TestSession {
    match Session::new(
        backend,
        cfg,
        Interaction::default(),
        LineInput::new(Cursor::new(input.as_ref().to_vec())),
        Vec::new(),
    ) {
        Ok(s) => s,
        Err(e) => panic!("session setup failed: {e}"),
    }
}

pub fn output(s: &TestSession) -> String {
    String::from_utf8_lossy(s.output()).into_owned()
}
