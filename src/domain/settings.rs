// ============================================================
// Layer 3 — Settings
// ============================================================
// The shape of the YAML settings file. Every key is optional;
// missing keys take the values from `Settings::default()`.
//
// Example config.yaml:
//   src_vocab_size: 32000
//   tgt_vocab_size: 32000
//   src_seq_len: 350
//   tgt_seq_len: 350
//   d_model: 512
//   num_layers: 6
//   num_heads: 8
//   dropout: 0.1
//   d_ff: 2048
//   model_folder: weights
//   model_basename: tmodel_
//   preload: latest

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Value of `preload` that selects the newest checkpoint on disk.
pub const PRELOAD_LATEST: &str = "latest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    pub src_seq_len:    usize,
    pub tgt_seq_len:    usize,
    pub d_model:        usize,
    pub num_layers:     usize,
    pub num_heads:      usize,
    pub dropout:        f64,
    pub d_ff:           usize,

    /// Directory holding weight files and the architecture JSON
    pub model_folder:   String,
    /// Weight files are named `{model_basename}{epoch:02}`
    pub model_basename: String,
    /// `None`, `"latest"`, or an epoch number such as `"07"`
    pub preload:        Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            src_vocab_size: 32000,
            tgt_vocab_size: 32000,
            src_seq_len:    350,
            tgt_seq_len:    350,
            d_model:        512,
            num_layers:     6,
            num_heads:      8,
            dropout:        0.1,
            d_ff:           2048,
            model_folder:   "weights".to_string(),
            model_basename: "tmodel_".to_string(),
            preload:        Some(PRELOAD_LATEST.to_string()),
        }
    }
}

impl Settings {
    /// Reject settings the model builder would panic on.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.src_vocab_size > 0, "src_vocab_size must be positive");
        ensure!(self.tgt_vocab_size > 0, "tgt_vocab_size must be positive");
        ensure!(self.src_seq_len > 0, "src_seq_len must be positive");
        ensure!(self.tgt_seq_len > 0, "tgt_seq_len must be positive");
        ensure!(self.d_model > 0, "d_model must be positive");
        ensure!(self.num_layers > 0, "num_layers must be positive");
        ensure!(self.d_ff > 0, "d_ff must be positive");
        ensure!(self.num_heads > 0, "num_heads must be positive");
        ensure!(
            self.d_model % self.num_heads == 0,
            "d_model ({}) must be divisible by num_heads ({})",
            self.d_model,
            self.num_heads
        );
        ensure!(
            (0.0..1.0).contains(&self.dropout),
            "dropout must be in [0, 1), got {}",
            self.dropout
        );
        ensure!(!self.model_basename.is_empty(), "model_basename must not be empty");
        Ok(())
    }
}
