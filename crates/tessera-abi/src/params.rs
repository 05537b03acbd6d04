use serde::{Deserialize, Serialize};

/// Load-time knobs handed to the backend when a model session is created.
/// Crosses the plugin boundary as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextParams {
    /// Context window capacity in tokens.
    pub n_ctx: u32,
    /// RNG seed for the sampler.
    pub seed: i64,
    /// Keep the KV cache in half precision.
    pub f16_kv: bool,
    /// Pin model memory so it is never swapped out.
    pub use_mlock: bool,
    /// Worker threads used by the backend for evaluation.
    pub n_threads: u32,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            n_ctx: 512,
            seed: 0,
            f16_kv: true,
            use_mlock: false,
            n_threads: num_cpus::get_physical().max(1) as u32,
        }
    }
}
