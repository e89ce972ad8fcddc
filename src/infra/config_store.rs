// ============================================================
// Layer 6 — YAML Config Store
// ============================================================
// Reads and updates the settings file (config.yaml by default).
//
//   load_raw() → the top-level YAML mapping, untouched
//   load()     → the mapping parsed into `Settings`
//   update()   → overwrite top-level keys, write back, re-parse
//   write()    → create/overwrite the file from typed settings
//
// update() only touches the keys it is given; unknown keys
// already in the file are preserved.

use anyhow::{anyhow, bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::settings::Settings;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the file as a YAML mapping. An empty file is an empty mapping.
    pub fn load_raw(&self) -> Result<Mapping> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot find the {} file", self.path.display()))?;

        match serde_yaml::from_str::<Value>(&text)
            .with_context(|| format!("Invalid YAML in '{}'", self.path.display()))?
        {
            Value::Mapping(map) => Ok(map),
            Value::Null         => Ok(Mapping::new()),
            other => bail!(
                "'{}' must contain a mapping at the top level, found {}",
                self.path.display(),
                kind_of(&other)
            ),
        }
    }

    pub fn load(&self) -> Result<Settings> {
        let raw = self.load_raw()?;
        let settings: Settings = serde_yaml::from_value(Value::Mapping(raw))
            .with_context(|| format!("Invalid settings in '{}'", self.path.display()))?;
        tracing::debug!("Loaded settings from '{}'", self.path.display());
        Ok(settings)
    }

    /// Merge `new_settings` into the file's top-level keys and persist.
    ///
    /// The merged document must still parse as `Settings`; otherwise the
    /// file is left untouched.
    pub fn update(&self, new_settings: Mapping) -> Result<Settings> {
        let mut config = self.load_raw()?;
        for (key, value) in &new_settings {
            config.insert(key.clone(), value.clone());
        }

        let settings: Settings = serde_yaml::from_value(Value::Mapping(config.clone()))
            .context("Updated settings are not valid")?;

        self.write_mapping(&config)?;
        for (key, value) in &new_settings {
            tracing::info!("config: {} = {}", display_key(key), serde_yaml::to_string(value)?.trim());
        }
        Ok(settings)
    }

    pub fn write(&self, settings: &Settings) -> Result<()> {
        match serde_yaml::to_value(settings)? {
            Value::Mapping(map) => self.write_mapping(&map),
            _ => Err(anyhow!("settings did not serialise to a mapping")),
        }
    }

    fn write_mapping(&self, map: &Mapping) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let text = serde_yaml::to_string(map)?;
        fs::write(&self.path, text)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;
        tracing::debug!("Wrote settings to '{}'", self.path.display());
        Ok(())
    }
}

/// Parse `key=value` pairs from the command line. Values are read as YAML
/// scalars, so `d_model=256` is a number and `preload=null` clears the key.
pub fn parse_assignments<S: AsRef<str>>(pairs: &[S]) -> Result<Mapping> {
    let mut map = Mapping::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{pair}'"))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty key in '{pair}'");
        }
        let value: Value = serde_yaml::from_str(value.trim())
            .with_context(|| format!("Cannot parse value for '{key}'"))?;
        map.insert(Value::String(key.to_string()), value);
    }
    Ok(map)
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => format!("{other:?}"),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null        => "null",
        Value::Bool(_)     => "a boolean",
        Value::Number(_)   => "a number",
        Value::String(_)   => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_)  => "a mapping",
        Value::Tagged(_)   => "a tagged value",
    }
}
