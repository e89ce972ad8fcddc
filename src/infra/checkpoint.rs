// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Resolves weight-file paths and saves/restores model weights
// using Burn's CompactRecorder.
//
// File layout:
//   {model_folder}/
//     {model_basename}00.mpk     ← weights saved for epoch 0
//     {model_basename}01.mpk     ← weights saved for epoch 1
//     ...
//     transformer_config.json    ← architecture hyper-parameters
//
// Paths returned by this module carry no extension; the
// recorder appends its own when writing and reading.
//
// The architecture JSON is what lets a checkpoint be rebuilt
// without the YAML settings file: the model has to exist with
// the right shapes before its record can be loaded into it.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{anyhow, bail, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::settings::{Settings, PRELOAD_LATEST};
use crate::ml::transformer::{Transformer, TransformerConfig};

pub const CONFIG_FILE_NAME: &str = "transformer_config.json";

pub struct CheckpointManager {
    dir:      PathBuf,
    basename: String,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>, basename: impl Into<String>) -> Self {
        Self { dir: dir.into(), basename: basename.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.model_folder, settings.model_basename.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{dir}/{basename}{epoch:02}`
    pub fn weights_file_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("{}{:02}", self.basename, epoch))
    }

    /// Path of the checkpoint with the highest epoch number, or `None` when
    /// the folder is missing or holds no matching file.
    ///
    /// Epochs are compared numerically, so `tmodel_100` sorts after
    /// `tmodel_99`.
    pub fn latest_weights_file_path(&self) -> Option<PathBuf> {
        self.saved_epochs()
            .into_iter()
            .max()
            .map(|epoch| self.weights_file_path(epoch))
    }

    /// Every epoch that has a weight file on disk, ascending.
    pub fn saved_epochs(&self) -> Vec<usize> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut epochs: Vec<usize> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| self.epoch_of(&entry.file_name().to_string_lossy()))
            .collect();
        epochs.sort_unstable();
        epochs.dedup();
        epochs
    }

    /// Turn the `preload` setting into a concrete weights path.
    ///
    ///   None        → start from fresh weights
    ///   "latest"    → newest checkpoint; error if there is none
    ///   "<digits>"  → that epoch; error if its file is missing
    pub fn resolve_preload(&self, preload: Option<&str>) -> Result<Option<PathBuf>> {
        let Some(preload) = preload.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };

        if preload == PRELOAD_LATEST {
            return self
                .latest_weights_file_path()
                .map(Some)
                .ok_or_else(|| anyhow!(
                    "No checkpoint named '{}*' in '{}'",
                    self.basename,
                    self.dir.display()
                ));
        }

        let epoch: usize = preload
            .parse()
            .with_context(|| format!("preload must be '{PRELOAD_LATEST}' or an epoch number, got '{preload}'"))?;
        if !self.saved_epochs().contains(&epoch) {
            bail!("No checkpoint for epoch {} in '{}'", epoch, self.dir.display());
        }
        Ok(Some(self.weights_file_path(epoch)))
    }

    /// Save model weights as `{basename}{epoch:02}` and return that path.
    pub fn save_model<B: Backend>(&self, model: &Transformer<B>, epoch: usize) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.weights_file_path(epoch);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::info!("Saved checkpoint: epoch {} → '{}'", epoch, path.display());
        Ok(path)
    }

    /// Load the weights at `path` into `model`. The architecture of
    /// `model` must match the one the weights were saved from.
    pub fn load_model<B: Backend>(
        &self,
        model:  Transformer<B>,
        path:   &Path,
        device: &B::Device,
    ) -> Result<Transformer<B>> {
        tracing::info!("Loading checkpoint '{}'", path.display());

        let record = CompactRecorder::new()
            .load(path.to_path_buf(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TransformerConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE_NAME);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved transformer config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TransformerConfig> {
        let path = self.dir.join(CONFIG_FILE_NAME);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Run 'init' first.",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid transformer config in '{}'", path.display()))
    }

    /// `tmodel_07.mpk` → Some(7) when the basename is `tmodel_`.
    fn epoch_of(&self, file_name: &str) -> Option<usize> {
        let rest   = file_name.strip_prefix(self.basename.as_str())?;
        let digits = rest.split('.').next()?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}
