//! Resource key resolution command.

use std::path::Path;

use super::common::load_app;
use crate::error::CliError;

/// Resolve a logical resource key against the downloaded assets on disk.
///
/// The index is rebuilt from the configured download directory, so keys for
/// assets downloaded in earlier runs resolve too. An unmapped key is an
/// error (nonzero exit).
pub async fn run(config_path: Option<&Path>, key: &str) -> Result<(), CliError> {
    let app = load_app(config_path)?;

    let dir = &app.config().download_dir;
    if dir.is_dir() {
        app.registry()
            .publish_dir(dir)
            .await
            .map_err(|e| CliError::Resolve(e.to_string()))?;
    }

    match app.registry().resolve(key) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::Resolve(format!(
            "no asset registered under key {key}"
        ))),
    }
}
