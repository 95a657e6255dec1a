// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for the pour lab.
//!
//! Each key maps to `<base>/<key>.json`. The base is the platform config
//! directory (e.g. `~/.config/PourLab`) unless a directory is given, which
//! is how `pour-lab --config-dir` points the lab at `lab.json` elsewhere.
//! Writes go to a sibling temp file first and are renamed into place, so a
//! reader never sees a half-written config.

use directories::ProjectDirs;
use lab_app_core::config::{ConfigError, ConfigStore};
use lab_app_core::settings::LAB_CONFIG_KEY;
use std::fs;
use std::path::{Path, PathBuf};

/// Store configs as JSON files under a base directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory.
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "PourLab")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::at(proj.config_dir())
    }

    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory the store reads and writes.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }

    /// File backing the lab config.
    pub fn lab_path(&self) -> PathBuf {
        self.path_for(LAB_CONFIG_KEY)
    }

    fn checked_path(&self, key: &str) -> Result<PathBuf, ConfigError> {
        let plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if plain {
            Ok(self.path_for(key))
        } else {
            Err(ConfigError::Other(format!("invalid config key {key:?}")))
        }
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.checked_path(key)?;
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.checked_path(key)?;
        fs::create_dir_all(&self.base)?;
        let staging = self.base.join(format!(".{key}.json.tmp"));
        fs::write(&staging, data)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}
