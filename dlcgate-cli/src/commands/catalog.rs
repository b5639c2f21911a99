//! Catalog listing command.

use std::path::Path;

use chrono::DateTime;
use console::style;
use dlcgate::catalog::{EntitlementStatus, InstallStatus};

use super::common::load_app;
use crate::error::CliError;

/// Fetch and print the asset catalog, optionally with the purchase ledger.
pub async fn run(config_path: Option<&Path>, purchases: bool) -> Result<(), CliError> {
    let app = load_app(config_path)?;

    app.catalog()
        .refresh(app.backend().as_ref())
        .await
        .map_err(|e| CliError::Store(e.to_string()))?;

    let descriptors = app.catalog().snapshot().unwrap_or_default();
    if descriptors.is_empty() {
        println!("The catalog is empty.");
    } else {
        println!("{}", style("Catalog").bold());
        for descriptor in &descriptors {
            let owned = match descriptor.entitlement {
                EntitlementStatus::Entitled => style("entitled").green(),
                EntitlementStatus::NotEntitled => style("not entitled").dim(),
            };
            let installed = match descriptor.install {
                InstallStatus::Installed => style("installed").green(),
                InstallStatus::InProgress => style("in progress").yellow(),
                InstallStatus::NotInstalled => style("not installed").dim(),
            };
            println!(
                "  {:12} {:10} {} / {}",
                descriptor.sku, descriptor.asset_id, owned, installed
            );
        }
    }

    if purchases {
        let ledger = app
            .purchaser()
            .fetch_purchases()
            .await
            .map_err(|e| CliError::Store(e.to_string()))?;

        println!();
        println!("{}", style("Purchases").bold());
        if ledger.is_empty() {
            println!("  none");
        }
        for record in &ledger {
            let granted = DateTime::from_timestamp(record.grant_time as i64, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| record.grant_time.to_string());
            println!("  {:12} {:10} granted {}", record.sku, record.purchase_id, granted);
        }
    }

    Ok(())
}
