use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tessera_core::SessionConfig;

/// Chat with an instruction-tuned model. Generated text goes to stdout,
/// diagnostics to stderr.
#[derive(Debug, Parser)]
#[command(name = "tessera", version, about)]
pub struct Cli {
    /// JSON file with session settings; flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model path handed to the backend.
    #[arg(short, long, env = "TESSERA_MODEL")]
    pub model: Option<PathBuf>,

    /// Backend plugin shared library.
    #[arg(long, env = "TESSERA_PLUGIN_PATH")]
    pub plugin: Option<PathBuf>,

    /// Initial prompt (kept verbatim when the context is recycled).
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Read the initial prompt from a file.
    #[arg(short, long, conflicts_with = "prompt")]
    pub file: Option<PathBuf>,

    /// Context window size in tokens.
    #[arg(short = 'c', long)]
    pub ctx_size: Option<usize>,

    /// Tokens per evaluation batch while replaying input.
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// Tokens to generate per turn (-1 = unbounded).
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub n_predict: Option<i32>,

    #[arg(short = 't', long)]
    pub threads: Option<u32>,

    /// RNG seed (<= 0 picks one from the clock).
    #[arg(short, long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    #[arg(long)]
    pub top_k: Option<i32>,

    #[arg(long)]
    pub top_p: Option<f32>,

    #[arg(long)]
    pub temp: Option<f32>,

    #[arg(long)]
    pub repeat_last_n: Option<usize>,

    #[arg(long)]
    pub repeat_penalty: Option<f32>,

    /// Stop and hand control back when output ends with this text (repeatable).
    #[arg(short = 'r', long = "reverse-prompt")]
    pub reverse_prompt: Vec<String>,

    /// Text prepended to every user turn.
    #[arg(long)]
    pub in_prefix: Option<String>,

    /// Never let the model end its own turn.
    #[arg(long)]
    pub ignore_eos: bool,

    /// Keep the KV cache in f32 instead of f16.
    #[arg(long)]
    pub memory_f32: bool,

    #[arg(long)]
    pub mlock: bool,

    /// Colorise prompt, output and user input.
    #[arg(long)]
    pub color: bool,

    /// Dump the prompt tokens at startup.
    #[arg(long)]
    pub verbose_prompt: bool,

    /// Debug logging to stderr (overridden by TESSERA_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Defaults, then `--config`, then flags.
    pub fn into_config(self) -> Result<SessionConfig> {
        let mut cfg = match &self.config {
            Some(path) => SessionConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => SessionConfig::default(),
        };

        if let Some(file) = &self.file {
            cfg.prompt = fs::read_to_string(file)
                .with_context(|| format!("reading prompt file {}", file.display()))?;
        }
        if let Some(p) = self.prompt {
            cfg.prompt = p;
        }
        if let Some(m) = self.model {
            cfg.model = m;
        }
        if self.plugin.is_some() {
            cfg.plugin = self.plugin;
        }

        if let Some(v) = self.ctx_size {
            cfg.n_ctx = v;
        }
        if let Some(v) = self.batch_size {
            cfg.n_batch = v;
        }
        if let Some(v) = self.n_predict {
            cfg.n_predict = v;
        }
        if let Some(v) = self.threads {
            cfg.n_threads = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.top_k {
            cfg.top_k = v;
        }
        if let Some(v) = self.top_p {
            cfg.top_p = v;
        }
        if let Some(v) = self.temp {
            cfg.temp = v;
        }
        if let Some(v) = self.repeat_last_n {
            cfg.repeat_last_n = v;
        }
        if let Some(v) = self.repeat_penalty {
            cfg.repeat_penalty = v;
        }

        cfg.antiprompt.extend(self.reverse_prompt);
        if let Some(v) = self.in_prefix {
            cfg.input_prefix = v;
        }

        cfg.ignore_eos |= self.ignore_eos;
        if self.memory_f32 {
            cfg.memory_f16 = false;
        }
        cfg.use_mlock |= self.mlock;
        cfg.use_color |= self.color;
        cfg.verbose_prompt |= self.verbose_prompt;

        Ok(cfg)
    }
}
