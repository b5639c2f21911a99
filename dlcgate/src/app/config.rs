//! Application configuration for StoreApp.

use std::path::PathBuf;

use crate::config::ConfigFile;

/// Top-level configuration passed to [`StoreApp`](super::StoreApp).
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the storefront API.
    pub backend_url: String,

    /// Directory downloaded asset files are written to.
    pub download_dir: PathBuf,

    /// SKUs whose display prices are fetched at startup.
    pub skus: Vec<String>,

    /// Sandbox context: checkout is unavailable; purchases bypass to a
    /// bulk download of everything available.
    pub sandbox: bool,
}

impl AppConfig {
    /// Create a config with no SKUs and checkout enabled.
    pub fn new(backend_url: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend_url: backend_url.into(),
            download_dir: download_dir.into(),
            skus: Vec::new(),
            sandbox: false,
        }
    }

    /// Set the configured SKU list.
    pub fn with_skus(mut self, skus: Vec<String>) -> Self {
        self.skus = skus;
        self
    }

    /// Mark this as a sandbox context.
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Build application config from a loaded configuration file.
    ///
    /// Keeps the translation logic in one place rather than scattered in
    /// CLI code.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            backend_url: config.store.url.clone(),
            download_dir: config.download.directory.clone(),
            skus: config.store.skus.clone(),
            sandbox: config.store.sandbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AppConfig::new("https://store.example/api", "/tmp/assets");
        assert!(config.skus.is_empty());
        assert!(!config.sandbox);
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.store.skus = vec!["pack1".to_string()];
        file.store.sandbox = true;

        let config = AppConfig::from_config_file(&file);
        assert_eq!(config.backend_url, file.store.url);
        assert_eq!(config.skus, vec!["pack1"]);
        assert!(config.sandbox);
    }
}
