//! Startup reconciliation command.

use std::path::Path;

use console::style;

use super::common::{drain_downloads, load_app};
use crate::error::CliError;

/// Run the full startup sequence: fetch the catalog, download every
/// entitled asset that is not installed, then print the resource index.
pub async fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let app = load_app(config_path)?;

    let reconcile = app.start().await;

    if !app.catalog().is_populated() {
        return Err(CliError::Store(
            "catalog fetch failed; nothing to reconcile".to_string(),
        ));
    }

    let handles = reconcile
        .await
        .map_err(|e| CliError::Download(e.to_string()))?;

    if handles.is_empty() {
        println!("All entitled assets are already installed.");
    } else {
        println!("Reconciling {} asset(s)...", handles.len());
        let failures = drain_downloads(handles).await;
        if failures > 0 {
            return Err(CliError::Download(format!("{} transfer(s) failed", failures)));
        }
    }

    let entries = app.registry().entries();
    if !entries.is_empty() {
        println!();
        println!("{}", style("Resource index").bold());
        for entry in &entries {
            println!("  {:24} {}", entry.key, entry.path.display());
        }
    }

    Ok(())
}
