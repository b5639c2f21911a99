//! Common utilities shared across CLI commands.

use std::path::Path;

use dlcgate::app::{AppConfig, StoreApp};
use dlcgate::backend::DownloadResult;
use dlcgate::config::ConfigFile;
use dlcgate::download::{DownloadError, DownloadHandle};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliError;

/// Load configuration and assemble the store app.
///
/// `config_path` overrides the default config location when given.
pub fn load_app(config_path: Option<&Path>) -> Result<StoreApp, CliError> {
    let file = match config_path {
        Some(path) => ConfigFile::load_from(path),
        None => ConfigFile::load(),
    }
    .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(StoreApp::new(AppConfig::from_config_file(&file)))
}

/// Byte-progress bar style shared by all transfer displays.
fn transfer_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg:12} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

/// Drive one download to completion, rendering its advisory progress.
///
/// The transfer does not depend on this display; dropping out early would
/// not cancel anything.
pub async fn wait_with_progress(handle: DownloadHandle) -> Result<DownloadResult, DownloadError> {
    let bar = ProgressBar::new(0);
    bar.set_style(transfer_style());
    bar.set_message(handle.asset_id().to_string());

    let mut progress = handle.progress();
    let wait = handle.wait();
    tokio::pin!(wait);

    loop {
        tokio::select! {
            outcome = &mut wait => {
                match &outcome {
                    Ok(result) => bar.finish_with_message(format!(
                        "{} done",
                        result.local_path.display()
                    )),
                    Err(_) => bar.abandon_with_message("failed"),
                }
                return outcome;
            }
            changed = progress.changed() => {
                match changed {
                    Ok(()) => {
                        let update = *progress.borrow();
                        if update.bytes_total > 0 {
                            bar.set_length(update.bytes_total);
                        }
                        bar.set_position(update.bytes_transferred);
                    }
                    // Progress stream terminated; the terminal result is
                    // imminent.
                    Err(_) => {
                        let outcome = wait.await;
                        match &outcome {
                            Ok(result) => bar.finish_with_message(format!(
                                "{} done",
                                result.local_path.display()
                            )),
                            Err(_) => bar.abandon_with_message("failed"),
                        }
                        return outcome;
                    }
                }
            }
        }
    }
}

/// Drive a batch of downloads sequentially, reporting each outcome.
///
/// Returns the number of failed transfers.
pub async fn drain_downloads(handles: Vec<DownloadHandle>) -> usize {
    let mut failures = 0;
    for handle in handles {
        let asset_id = handle.asset_id().to_string();
        if let Err(err) = wait_with_progress(handle).await {
            eprintln!("  {} failed: {}", asset_id, err);
            failures += 1;
        }
    }
    failures
}
