//! Demo settings
//!
//! Settings are read from `~/.config/polyar/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polyar_catalog::CatalogConfig;
use polyar_scene::SessionConfig;
use serde::{Deserialize, Serialize};

/// Identifier of the asset shown when nothing else is configured
pub const DEFAULT_ASSET_ID: &str = "1la6FabVzzB";

/// All demo settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub asset: AssetSettings,
    pub catalog: CatalogConfig,
    pub storage: StorageSettings,
    pub session: SessionConfig,
    pub log: LogSettings,
}

impl AppSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("polyar"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the default location. A missing file gives the
    /// defaults; an unknown config directory or a bad file is an error the
    /// caller reports once logging is up.
    pub fn load() -> Result<Self> {
        let path = Self::settings_path().context("Could not determine config directory")?;
        Self::load_from(&path)
    }

    /// Load settings from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse settings {:?}", path))
    }
}

/// Which asset to fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub identifier: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_ASSET_ID.to_string(),
        }
    }
}

/// Where downloaded assets are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the platform data directory when set
    pub root: Option<PathBuf>,
}

impl StorageSettings {
    /// Configured root, else `<data dir>/polyar/assets`, else `./assets`
    pub fn resolved_root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("polyar").join("assets"))
                .unwrap_or_else(|| PathBuf::from("assets"))
        })
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `polyar_pipeline=debug`
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
