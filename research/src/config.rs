//! Persistent research configuration.
//!
//! Stored as JSON in a platform-appropriate config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// On-disk configuration for the research sorter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Named preset, or `customized` to use `filter_string`.
    pub filter_preset: String,

    /// Custom rule string such as `S3-DR-0.5 > S3 > shortest > reset`.
    pub filter_string: String,

    pub use_coin: bool,
    pub use_cube: bool,
    pub use_part: bool,

    /// Research catalog JSON. Defaults to `<assets>/research/catalog.json`.
    pub catalog_path: Option<PathBuf>,

    /// Overrides asset discovery (OCR models and template libraries).
    pub assets_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter_preset: data::DEFAULT_PRESET.to_string(),
            filter_string: String::new(),
            use_coin: true,
            use_cube: true,
            use_part: true,
            catalog_path: None,
            assets_dir: None,
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("config_dir() unavailable")?;
        Ok(base.join("research.json"))
    }

    /// Load configuration from disk, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load config; using defaults");
                Self::default()
            }
        }
    }

    /// Try to load configuration from disk.
    pub fn try_load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// A missing file is not an error and yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
        let cfg = serde_json::from_str(&json).with_context(|| format!("parse {:?}", path))?;
        Ok(cfg)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, json).with_context(|| format!("write {:?}", path))?;
        Ok(())
    }

    pub fn availability(&self) -> data::Availability {
        data::Availability {
            coin: self.use_coin,
            cube: self.use_cube,
            part: self.use_part,
        }
    }
}
