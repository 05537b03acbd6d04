use serde::{Deserialize, Serialize};

/// Sampling knobs passed from the session to the backend on every draw.
/// The distribution math itself lives in the backend; these are only requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub top_k: i32,       // >= 1 keeps the K most likely candidates
    pub top_p: f32,       // (0, 1] nucleus sampling
    pub temperature: f32, // > 0.0 enables temperature scaling
    pub repeat_penalty: f32,
    /// Number of trailing history tokens the penalty looks at; <= 0 disables.
    pub repeat_last_n: i32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            top_k: 40,
            top_p: 0.95,
            temperature: 0.80,
            repeat_penalty: 1.10,
            repeat_last_n: 64,
        }
    }
}

impl SamplingParams {
    /// Returns a clamped copy that every backend can accept.
    ///
    /// Clamps:
    /// - top_k < 1 → 1
    /// - top_p ∉ (0, 1] → 1.0
    /// - temperature < 0 → 0 (greedy)
    /// - repeat_penalty < 1.0 → 1.0
    /// - repeat_last_n < 0 → 0
    pub fn normalized(&self) -> Self {
        let mut p = self.clone();

        if p.top_k < 1 {
            p.top_k = 1;
        }
        if !(p.top_p > 0.0 && p.top_p <= 1.0) {
            p.top_p = 1.0;
        }
        if p.temperature < 0.0 {
            p.temperature = 0.0;
        }
        if p.repeat_penalty < 1.0 {
            p.repeat_penalty = 1.0;
        }
        if p.repeat_last_n < 0 {
            p.repeat_last_n = 0;
        }

        p
    }
}
