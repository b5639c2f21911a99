//! Per-asset download tracking.
//!
//! The [`DownloadTracker`] issues download requests against the backend,
//! fans out advisory progress, and runs the success side effects: exactly
//! one resource registration followed by exactly one catalog refresh per
//! completed transfer.
//!
//! # Architecture
//!
//! ```text
//! start(asset_id)
//!     │  in-flight guard (reject duplicates)
//!     ▼
//! spawned transfer task
//!     ├── backend.download() ──► progress watch channel (advisory)
//!     ├── on success: registry.register(path) ──► catalog.refresh()
//!     ├── on failure: log, no registration, no refresh
//!     └── terminal result ──► DownloadHandle::wait()
//! ```
//!
//! Each stage's outcome is independently observable: progress through the
//! watch channel, registration through the registry, refresh through the
//! catalog, and the terminal result through the handle.

mod handle;

pub use handle::DownloadHandle;
pub use crate::backend::TransferProgress;

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use crate::backend::{BackendError, DownloadResult, StoreBackend};
use crate::catalog::CatalogStore;
use crate::registry::{RegistryError, ResourceRegistry};

/// Result type for download operations.
pub type DownloadOutcome = Result<DownloadResult, DownloadError>;

/// Errors terminating a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A transfer for this asset is already running. The duplicate request
    /// is rejected; the original transfer is unaffected.
    #[error("download already in flight for asset {asset_id}")]
    AlreadyInFlight { asset_id: String },

    /// The backend transfer failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The downloaded file could not be published to the resource index.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The transfer task went away without reporting a result.
    #[error("download task for asset {asset_id} ended without a result")]
    TaskLost { asset_id: String },
}

/// Issues download requests and tracks in-flight transfers.
///
/// # Thread Safety
///
/// The in-flight set is claimed synchronously inside [`start`](Self::start),
/// before the transfer task is spawned, so two racing callers can never both
/// start a transfer for the same asset.
pub struct DownloadTracker {
    backend: Arc<dyn StoreBackend>,
    registry: Arc<ResourceRegistry>,
    catalog: Arc<CatalogStore>,

    /// Progress receivers for transfers currently running, keyed by asset id.
    in_flight: Arc<DashMap<String, watch::Receiver<TransferProgress>>>,
}

impl DownloadTracker {
    /// Create a tracker wired to the shared registry and catalog.
    pub fn new(
        backend: Arc<dyn StoreBackend>,
        registry: Arc<ResourceRegistry>,
        catalog: Arc<CatalogStore>,
    ) -> Self {
        Self {
            backend,
            registry,
            catalog,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Start downloading one asset.
    ///
    /// The transfer runs on a spawned task; the returned handle exposes the
    /// advisory progress channel and the awaitable terminal result. Side
    /// effects on success (registration, then catalog refresh) run on the
    /// transfer task before the terminal result is delivered.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::AlreadyInFlight`] without spawning anything
    /// when a transfer for `asset_id` is already running.
    pub fn start(&self, asset_id: &str) -> Result<DownloadHandle, DownloadError> {
        let (progress_tx, progress_rx) = watch::channel(TransferProgress::default());

        // Claim the in-flight slot before spawning; this is the duplicate
        // guard.
        match self.in_flight.entry(asset_id.to_string()) {
            dashmap::Entry::Occupied(_) => {
                return Err(DownloadError::AlreadyInFlight {
                    asset_id: asset_id.to_string(),
                });
            }
            dashmap::Entry::Vacant(slot) => {
                slot.insert(progress_rx.clone());
            }
        }

        let (done_tx, done_rx) = oneshot::channel();
        let asset_id = asset_id.to_string();
        let backend = Arc::clone(&self.backend);
        let registry = Arc::clone(&self.registry);
        let catalog = Arc::clone(&self.catalog);
        let in_flight = Arc::clone(&self.in_flight);

        debug!(asset_id, "download requested");
        tokio::spawn({
            let asset_id = asset_id.clone();
            async move {
                let outcome =
                    run_transfer(&asset_id, backend, registry, catalog, progress_tx).await;
                in_flight.remove(&asset_id);
                match &outcome {
                    Ok(result) => info!(
                        asset_id,
                        path = %result.local_path.display(),
                        bytes = result.bytes_transferred,
                        "download complete"
                    ),
                    Err(err) => warn!(asset_id, %err, "download failed"),
                }
                // The handle may have been dropped; the side effects above
                // already ran regardless.
                let _ = done_tx.send(outcome);
            }
        });

        Ok(DownloadHandle::new(asset_id, progress_rx, done_rx))
    }

    /// Progress receiver for an in-flight transfer, if one is running.
    ///
    /// Returns `None` once the transfer has reached its terminal result.
    pub fn progress(&self, asset_id: &str) -> Option<watch::Receiver<TransferProgress>> {
        self.in_flight.get(asset_id).map(|rx| rx.clone())
    }

    /// Number of transfers currently running.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

/// The download pipeline for one asset: transfer, register, refresh.
///
/// Failure at any stage stops the pipeline; later stages do not run.
async fn run_transfer(
    asset_id: &str,
    backend: Arc<dyn StoreBackend>,
    registry: Arc<ResourceRegistry>,
    catalog: Arc<CatalogStore>,
    progress_tx: watch::Sender<TransferProgress>,
) -> DownloadOutcome {
    let result = backend.download(asset_id, progress_tx).await?;

    let entry = registry.register(&result.local_path)?;
    info!(asset_id, key = entry.key, "asset published to resource index");

    // Refresh so install status reflects the new download. A failed refresh
    // is logged but does not fail the download; the file is already
    // registered and usable.
    if let Err(err) = catalog.refresh(backend.as_ref()).await {
        warn!(asset_id, %err, "catalog refresh after download failed");
    }

    Ok(result)
}
