// ============================================================
// Layer 2 — InitUseCase
// ============================================================
//   Step 1: Validate settings
//   Step 2: Build the transformer (Xavier-initialised)
//   Step 3: Save the architecture JSON
//   Step 4: Save the weights as epoch 0

use anyhow::{bail, Result};
use burn::prelude::*;
use std::path::PathBuf;

use crate::domain::settings::Settings;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::transformer::{Transformer, TransformerConfig};

#[derive(Debug, Clone)]
pub struct InitReport {
    pub num_params:   usize,
    pub weights_path: PathBuf,
}

pub struct InitUseCase {
    settings: Settings,
    force:    bool,
}

impl InitUseCase {
    /// With `force = false`, refuses to run when the model folder already
    /// holds checkpoints.
    pub fn new(settings: Settings, force: bool) -> Self {
        Self { settings, force }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<InitReport> {
        self.settings.validate()?;

        let ckpt = CheckpointManager::from_settings(&self.settings);
        let existing = ckpt.saved_epochs();
        if !existing.is_empty() && !self.force {
            bail!(
                "'{}' already holds {} checkpoint(s); pass --force to overwrite epoch 0",
                ckpt.dir().display(),
                existing.len()
            );
        }

        let cfg = TransformerConfig::from(&self.settings);
        let model: Transformer<B> = cfg.init(device);
        let num_params = model.num_params();
        tracing::info!(
            "Model ready: {} + {} layers, d_model={}, heads={}, {} parameters",
            cfg.num_layers, cfg.num_layers, cfg.d_model, cfg.num_heads, num_params
        );

        ckpt.save_config(&cfg)?;
        let weights_path = ckpt.save_model(&model, 0)?;

        Ok(InitReport { num_params, weights_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{tiny_settings, ScratchDir};
    use burn::backend::NdArray;

    #[test]
    fn test_init_saves_epoch_zero_and_config() {
        let device   = Default::default();
        let scratch  = ScratchDir::new("init");
        let settings = tiny_settings(&scratch);
        let report   = InitUseCase::new(settings.clone(), false)
            .execute::<NdArray>(&device)
            .unwrap();

        let ckpt = CheckpointManager::from_settings(&settings);
        assert_eq!(ckpt.saved_epochs(), vec![0]);
        assert_eq!(report.weights_path, ckpt.weights_file_path(0));
        assert_eq!(ckpt.load_config().unwrap().tgt_vocab_size, 18);
        assert!(report.num_params > 0);
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let device   = Default::default();
        let scratch  = ScratchDir::new("init-twice");
        let settings = tiny_settings(&scratch);
        InitUseCase::new(settings.clone(), false).execute::<NdArray>(&device).unwrap();

        assert!(InitUseCase::new(settings.clone(), false).execute::<NdArray>(&device).is_err());
        assert!(InitUseCase::new(settings, true).execute::<NdArray>(&device).is_ok());
    }

    #[test]
    fn test_invalid_settings_are_rejected_before_building() {
        let device   = Default::default();
        let scratch  = ScratchDir::new("init-invalid");
        let settings = Settings { num_heads: 3, ..tiny_settings(&scratch) };
        assert!(InitUseCase::new(settings, false).execute::<NdArray>(&device).is_err());
    }
}
