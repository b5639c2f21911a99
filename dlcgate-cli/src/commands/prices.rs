//! Price listing command.

use std::path::Path;

use console::style;

use super::common::load_app;
use crate::error::CliError;

/// Fetch and print display prices for the configured SKUs.
pub async fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let app = load_app(config_path)?;

    let pricing = app.pricing();
    if pricing.skus().is_empty() {
        println!("No SKUs configured; nothing to price.");
        return Ok(());
    }

    let quotes = pricing
        .fetch_quotes()
        .await
        .map_err(|e| CliError::Store(e.to_string()))?;

    if quotes.is_empty() {
        println!("The store returned no quotes for the configured SKUs.");
        return Ok(());
    }

    println!("{}", style("Prices").bold());
    for quote in &quotes {
        println!(
            "  {:12} {:30} {}",
            quote.sku,
            quote.display_name,
            style(&quote.formatted_price).green()
        );
    }

    Ok(())
}
