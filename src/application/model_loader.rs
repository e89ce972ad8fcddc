use anyhow::{anyhow, Result};
use burn::prelude::*;
use std::path::PathBuf;

use crate::domain::settings::Settings;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::transformer::{Transformer, TransformerConfig};

/// A model restored from disk together with where it came from.
pub struct LoadedModel<B: Backend> {
    pub model:      Transformer<B>,
    pub config:     TransformerConfig,
    pub checkpoint: PathBuf,
}

/// Rebuild the model described by `settings` and load its weights.
///
/// The checkpoint is the one named by `preload`, or the newest one when
/// `preload` is unset. The architecture comes from the JSON saved next to
/// the weights when present, otherwise from `settings`.
pub fn load_model<B: Backend>(settings: &Settings, device: &B::Device) -> Result<LoadedModel<B>> {
    let ckpt = CheckpointManager::from_settings(settings);

    let checkpoint = match ckpt.resolve_preload(settings.preload.as_deref())? {
        Some(path) => path,
        None => ckpt.latest_weights_file_path().ok_or_else(|| {
            anyhow!("No checkpoint found in '{}'. Run 'init' first.", ckpt.dir().display())
        })?,
    };

    let config = match ckpt.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("{e:#}; rebuilding the architecture from settings");
            settings.validate()?;
            TransformerConfig::from(settings)
        }
    };

    let model = ckpt.load_model(config.init::<B>(device), &checkpoint, device)?;
    Ok(LoadedModel { model, config, checkpoint })
}
