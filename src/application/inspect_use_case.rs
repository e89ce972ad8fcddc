// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Loads a checkpoint and reports what is inside it: which file,
// which architecture, and where the parameters live.

use anyhow::Result;
use burn::prelude::*;
use std::{fmt, path::PathBuf};

use crate::application::model_loader::load_model;
use crate::domain::settings::Settings;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::transformer::TransformerConfig;

#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub checkpoint:        PathBuf,
    pub saved_epochs:      Vec<usize>,
    pub config:            TransformerConfig,
    pub total_params:      usize,
    pub encoder_params:    usize,
    pub decoder_params:    usize,
    pub embedding_params:  usize,
    pub projection_params: usize,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(f, "checkpoint:   {}", self.checkpoint.display())?;
        writeln!(f, "epochs saved: {:?}", self.saved_epochs)?;
        writeln!(
            f,
            "architecture: d_model={} layers={} heads={} d_ff={} dropout={}",
            c.d_model, c.num_layers, c.num_heads, c.d_ff, c.dropout
        )?;
        writeln!(
            f,
            "vocab:        src={} tgt={}  seq_len: src={} tgt={}",
            c.src_vocab_size, c.tgt_vocab_size, c.src_seq_len, c.tgt_seq_len
        )?;
        writeln!(f, "parameters:   {}", self.total_params)?;
        writeln!(f, "  embeddings  {}", self.embedding_params)?;
        writeln!(f, "  encoder     {}", self.encoder_params)?;
        writeln!(f, "  decoder     {}", self.decoder_params)?;
        write!(f,   "  projection  {}", self.projection_params)
    }
}

pub struct InspectUseCase {
    settings: Settings,
}

impl InspectUseCase {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ModelSummary> {
        let loaded = load_model::<B>(&self.settings, device)?;
        let model  = &loaded.model;

        let summary = ModelSummary {
            saved_epochs:      CheckpointManager::from_settings(&self.settings).saved_epochs(),
            total_params:      model.num_params(),
            encoder_params:    model.encoder.num_params(),
            decoder_params:    model.decoder.num_params(),
            embedding_params:  model.src_embed.num_params() + model.tgt_embed.num_params(),
            projection_params: model.projection.num_params(),
            checkpoint:        loaded.checkpoint,
            config:            loaded.config,
        };
        tracing::debug!("Inspected '{}'", summary.checkpoint.display());
        Ok(summary)
    }
}
