// ============================================================
// Layer 2 — DecodeUseCase
// ============================================================
// Token ids in, token ids out. Tokenisation is out of scope, so
// the caller supplies source ids and the special-token ids.

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::application::model_loader::load_model;
use crate::domain::settings::Settings;
use crate::ml::{
    greedy::{greedy_decode, GreedyOptions},
    mask::padding_mask,
};

#[derive(Debug, Clone)]
pub struct DecodeRequest {
    pub src_ids: Vec<u32>,
    pub sos_id:  u32,
    pub eos_id:  u32,
    pub pad_id:  u32,
    /// Defaults to the target sequence length of the checkpoint.
    pub max_len: Option<usize>,
}

pub struct DecodeUseCase {
    settings: Settings,
}

impl DecodeUseCase {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn execute<B: Backend>(&self, req: &DecodeRequest, device: &B::Device) -> Result<Vec<u32>> {
        let loaded = load_model::<B>(&self.settings, device)?;
        let cfg    = &loaded.config;

        ensure!(!req.src_ids.is_empty(), "source sequence is empty");
        ensure!(
            req.src_ids.len() <= cfg.src_seq_len,
            "source has {} tokens but the model accepts at most {}",
            req.src_ids.len(),
            cfg.src_seq_len
        );
        if let Some(bad) = req.src_ids.iter().find(|&&id| id as usize >= cfg.src_vocab_size) {
            anyhow::bail!("token id {} is outside the source vocabulary ({})", bad, cfg.src_vocab_size);
        }
        for (name, id) in [("sos", req.sos_id), ("eos", req.eos_id)] {
            ensure!(
                (id as usize) < cfg.tgt_vocab_size,
                "{name} id {id} is outside the target vocabulary ({})",
                cfg.tgt_vocab_size
            );
        }

        let ids: Vec<i32> = req.src_ids.iter().map(|&t| t as i32).collect();
        let src = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), device)
            .reshape([1, req.src_ids.len()]);
        let src_mask = padding_mask(src.clone(), req.pad_id);

        let opts = GreedyOptions {
            sos_id:  req.sos_id,
            eos_id:  req.eos_id,
            max_len: req.max_len.unwrap_or(cfg.tgt_seq_len),
        };
        let out = greedy_decode(&loaded.model, src, Some(src_mask), opts);

        tracing::info!(
            "Decoded {} source tokens into {} target tokens using '{}'",
            req.src_ids.len(),
            out.len(),
            loaded.checkpoint.display()
        );
        Ok(out)
    }
}
