use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("prompt is too long ({len} tokens, max {max})")]
    PromptTooLong { len: usize, max: usize },

    #[error("prompt tokenized to nothing")]
    EmptyPrompt,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tokenization failed: {0}")]
    Tokenize(String),

    #[error("failed to eval: {0}")]
    Eval(String),

    #[error("sampling failed: {0}")]
    Sample(String),

    #[error("detokenize failed: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
