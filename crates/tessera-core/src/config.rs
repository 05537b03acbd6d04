//! Session configuration. Every field has a default so partial JSON files work.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, SessionError};
use tessera_abi::params::ContextParams;
use tessera_abi::sampling::SamplingParams;

/// Contexts larger than this were never seen in training by the reference models.
pub const TRAINED_CONTEXT_LIMIT: usize = 2048;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub model: PathBuf,
    /// Backend plugin to load; `None` means discover it.
    pub plugin: Option<PathBuf>,
    pub prompt: String,

    pub n_ctx: usize,
    pub n_batch: usize,
    /// Tokens to generate per turn; -1 = unbounded.
    pub n_predict: i32,
    pub n_threads: u32,
    /// <= 0 picks a time-based seed.
    pub seed: i64,

    pub repeat_last_n: usize,
    pub top_k: i32,
    pub top_p: f32,
    pub temp: f32,
    pub repeat_penalty: f32,

    pub antiprompt: Vec<String>,
    pub input_prefix: String,

    pub ignore_eos: bool,
    pub memory_f16: bool,
    pub use_mlock: bool,
    pub use_color: bool,
    pub verbose_prompt: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/llama-7B/ggml-model.bin"),
            plugin: None,
            prompt: String::new(),
            n_ctx: 512,
            n_batch: 8,
            n_predict: 128,
            n_threads: num_cpus::get_physical().max(1) as u32,
            seed: -1,
            repeat_last_n: 64,
            top_k: 40,
            top_p: 0.95,
            temp: 0.80,
            repeat_penalty: 1.10,
            antiprompt: Vec::new(),
            input_prefix: String::new(),
            ignore_eos: false,
            memory_f16: true,
            use_mlock: false,
            use_color: false,
            verbose_prompt: false,
        }
    }
}

impl SessionConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Structural checks that don't need the model.
    pub fn validate(&self) -> Result<()> {
        if self.n_ctx == 0 {
            return Err(SessionError::InvalidConfig("n_ctx must be > 0".into()));
        }
        if self.n_batch == 0 {
            return Err(SessionError::InvalidConfig("n_batch must be > 0".into()));
        }
        if self.repeat_last_n > self.n_ctx {
            return Err(SessionError::InvalidConfig(format!(
                "repeat_last_n ({}) exceeds n_ctx ({})",
                self.repeat_last_n, self.n_ctx
            )));
        }
        if self.n_ctx > TRAINED_CONTEXT_LIMIT {
            tracing::warn!(
                "model does not support context sizes greater than {TRAINED_CONTEXT_LIMIT} tokens ({} specified); expect poor results",
                self.n_ctx
            );
        }
        Ok(())
    }

    /// Fill in a time-based seed when none was given. Idempotent.
    pub fn resolve_seed(&mut self) -> i64 {
        if self.seed <= 0 {
            self.seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(1);
        }
        self.seed
    }

    pub fn context_params(&self) -> ContextParams {
        ContextParams {
            n_ctx: self.n_ctx as u32,
            seed: self.seed,
            f16_kv: self.memory_f16,
            use_mlock: self.use_mlock,
            n_threads: self.n_threads,
        }
    }

    pub fn sampling_params(&self) -> SamplingParams {
        SamplingParams {
            top_k: self.top_k,
            top_p: self.top_p,
            temperature: self.temp,
            repeat_penalty: self.repeat_penalty,
            repeat_last_n: self.repeat_last_n as i32,
        }
    }
}
