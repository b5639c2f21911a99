//! Purchase command.

use std::path::Path;

use console::style;
use dialoguer::Confirm;
use dlcgate::purchase::PurchaseOutcome;

use super::common::{drain_downloads, load_app, wait_with_progress};
use crate::error::CliError;

/// Purchase one SKU and download the granted asset.
///
/// In a sandbox context checkout is unavailable; the command instead
/// downloads every asset the catalog currently offers.
pub async fn run(config_path: Option<&Path>, sku: &str, yes: bool) -> Result<(), CliError> {
    let app = load_app(config_path)?;

    app.catalog()
        .refresh(app.backend().as_ref())
        .await
        .map_err(|e| CliError::Store(e.to_string()))?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Purchase {}?", style(sku).bold()))
            .default(false)
            .interact()
            .map_err(|e| CliError::Prompt(e.to_string()))?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let outcome = app
        .purchaser()
        .purchase(sku)
        .await
        .map_err(|e| CliError::Purchase(e.to_string()))?;

    match outcome {
        PurchaseOutcome::Purchased { record, download } => {
            println!(
                "Purchased {} (purchase id {})",
                style(&record.sku).bold(),
                record.purchase_id
            );
            let result = wait_with_progress(download)
                .await
                .map_err(|e| CliError::Download(e.to_string()))?;
            println!(
                "Downloaded {} ({} bytes)",
                result.local_path.display(),
                result.bytes_transferred
            );
        }
        PurchaseOutcome::SandboxBypass { downloads } => {
            println!(
                "{}",
                style("Checkout unavailable here; downloading all available assets.").yellow()
            );
            if downloads.is_empty() {
                println!("Nothing to download.");
                return Ok(());
            }
            let failures = drain_downloads(downloads).await;
            if failures > 0 {
                return Err(CliError::Download(format!("{} transfer(s) failed", failures)));
            }
        }
    }

    Ok(())
}
