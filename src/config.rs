use serde::{Deserialize, Serialize};

/// Tuning knobs for frequency counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inputs longer than this many bytes are counted in parallel.
    pub parallel_threshold: usize,
    /// Bytes handed to each parallel worker.
    pub chunk_size: usize,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel_threshold(mut self, bytes: usize) -> Self {
        self.parallel_threshold = bytes;
        self
    }

    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes;
        self
    }

    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel_threshold: 64_000,
            // 16k is about where chunking overhead stops paying off
            chunk_size: 16_000,
        }
    }
}
