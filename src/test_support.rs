use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::settings::Settings;

/// A fresh directory under the system temp dir, removed again on drop.
pub(crate) struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub(crate) fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("s2s-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Small settings whose model folder is `scratch`.
pub(crate) fn tiny_settings(scratch: &ScratchDir) -> Settings {
    Settings {
        src_vocab_size: 16,
        tgt_vocab_size: 18,
        src_seq_len:    8,
        tgt_seq_len:    8,
        d_model:        8,
        num_layers:     1,
        num_heads:      2,
        d_ff:           16,
        model_folder:   scratch.path().to_string_lossy().into_owned(),
        ..Settings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let scratch = ScratchDir::new("drop");
        let path    = scratch.path().to_path_buf();
        fs::write(path.join("tmodel_00.mpk"), b"").unwrap();
        assert!(path.is_dir());

        drop(scratch);
        assert!(!path.exists());
    }
}
