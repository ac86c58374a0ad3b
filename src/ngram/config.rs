//! Scoring parameters for the n-gram models.

/// N-gram scoring configuration.
#[derive(Debug, Clone)]
pub struct NgramConfig {
    /// Add-k (Laplace) smoothing constant. Keeps unseen n-grams from
    /// zeroing out a score with `-inf`.
    pub smoothing_k: f64,

    /// Effective vocabulary size used by the smoothing term. Roughly the
    /// alphabet size; 40 covers both the 33-letter Russian and 26-letter
    /// English alphabets with headroom for apostrophes and hyphens.
    pub vocab_size: usize,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            smoothing_k: 0.01,
            vocab_size: 40,
        }
    }
}

impl NgramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_smoothing(mut self, k: f64) -> Self {
        self.smoothing_k = k;
        self
    }

    pub fn with_vocab_size(mut self, v: usize) -> Self {
        self.vocab_size = v;
        self
    }
}
