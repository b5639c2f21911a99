//! Configuration file loading.
//!
//! DLCGate reads an INI file from the platform config directory
//! (`~/.config/dlcgate/config.ini` on Linux):
//!
//! ```ini
//! [store]
//! url = https://store.othstudios.example/api
//! skus = pack1,pack2
//! sandbox = false
//!
//! [download]
//! directory = /home/user/.local/share/dlcgate/assets
//! ```
//!
//! A missing file yields the defaults; a present but malformed file is an
//! error.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("failed to read config {path}: {reason}")]
    Read { path: PathBuf, reason: String },
}

/// `[store]` section: where the storefront lives and what it sells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSection {
    /// Base URL of the storefront API.
    pub url: String,
    /// SKUs whose prices are fetched at startup.
    pub skus: Vec<String>,
    /// Sandbox context: checkout is unavailable and purchases bypass to
    /// bulk download.
    pub sandbox: bool,
}

/// `[download]` section: where asset files land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSection {
    /// Directory downloaded asset files are written to.
    pub directory: PathBuf,
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub store: StoreSection,
    pub download: DownloadSection,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            store: StoreSection {
                url: "https://store.othstudios.example/api".to_string(),
                skus: Vec::new(),
                sandbox: false,
            },
            download: DownloadSection {
                directory: default_download_dir(),
            },
        }
    }
}

impl ConfigFile {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dlcgate")
            .join("config.ini")
    }

    /// Load from the default location; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::default();

        if let Some(store) = ini.section(Some("store")) {
            if let Some(url) = store.get("url") {
                config.store.url = url.trim_end_matches('/').to_string();
            }
            if let Some(skus) = store.get("skus") {
                config.store.skus = skus
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            if let Some(sandbox) = store.get("sandbox") {
                config.store.sandbox = matches!(sandbox.trim(), "true" | "1" | "yes");
            }
        }

        if let Some(download) = ini.section(Some("download")) {
            if let Some(directory) = download.get("directory") {
                config.download.directory = PathBuf::from(directory);
            }
        }

        Ok(config)
    }
}

/// Platform default for the asset download directory.
fn default_download_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dlcgate")
        .join("assets")
}
