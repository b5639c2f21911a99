//! Purchase initiation: checkout → download chain.
//!
//! A successful checkout immediately starts the download for the granted
//! purchase id; the purchase is not considered complete until the transfer
//! has started. In execution contexts where checkout cannot run (sandbox
//! and development builds), `purchase` instead downloads every available
//! asset so content can be exercised without a transaction backend.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{BackendError, BackendResult, PurchaseRecord, StoreBackend};
use crate::catalog::CatalogStore;
use crate::download::{DownloadError, DownloadHandle, DownloadTracker};
use crate::reconcile::{dispatch_available, ReconcileMode};

/// Errors from a purchase attempt.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// Checkout failed: user cancellation, payment decline or network
    /// error. No download was started.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Checkout succeeded but the download could not be started.
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// What a purchase call did.
#[derive(Debug)]
pub enum PurchaseOutcome {
    /// The real checkout path: one grant, one transfer started.
    Purchased {
        record: PurchaseRecord,
        download: DownloadHandle,
    },
    /// The sandbox bypass: checkout unavailable, every not-yet-installed
    /// asset in the current catalog snapshot was dispatched instead.
    SandboxBypass { downloads: Vec<DownloadHandle> },
}

/// Drives purchase transactions against the storefront.
pub struct PurchaseInitiator {
    backend: Arc<dyn StoreBackend>,
    catalog: Arc<CatalogStore>,
    tracker: Arc<DownloadTracker>,
}

impl PurchaseInitiator {
    /// Create an initiator wired to the shared catalog and tracker.
    pub fn new(
        backend: Arc<dyn StoreBackend>,
        catalog: Arc<CatalogStore>,
        tracker: Arc<DownloadTracker>,
    ) -> Self {
        Self {
            backend,
            catalog,
            tracker,
        }
    }

    /// Purchase one SKU and start downloading the granted asset.
    ///
    /// # Errors
    ///
    /// A checkout failure is logged and returned; no download is started in
    /// that case.
    pub async fn purchase(&self, sku: &str) -> Result<PurchaseOutcome, PurchaseError> {
        if !self.backend.supports_checkout() {
            info!(
                sku,
                "checkout unavailable in this environment; downloading all available assets"
            );
            let downloads =
                dispatch_available(&self.catalog, &self.tracker, ReconcileMode::AllAvailable);
            return Ok(PurchaseOutcome::SandboxBypass { downloads });
        }

        let record = match self.backend.purchase(sku).await {
            Ok(record) => record,
            Err(err) => {
                warn!(sku, %err, "checkout failed");
                return Err(err.into());
            }
        };
        info!(
            sku = record.sku,
            purchase_id = record.purchase_id,
            "purchase granted"
        );

        let download = self.tracker.start(&record.purchase_id)?;
        Ok(PurchaseOutcome::Purchased { record, download })
    }

    /// List the purchases already granted to the current user.
    ///
    /// Mirrors the backend's ledger; nothing is persisted locally.
    pub async fn fetch_purchases(&self) -> BackendResult<Vec<PurchaseRecord>> {
        let purchases = self.backend.purchases().await?;
        for purchase in &purchases {
            info!(
                sku = purchase.sku,
                purchase_id = purchase.purchase_id,
                grant_time = purchase.grant_time,
                "existing purchase"
            );
        }
        Ok(purchases)
    }
}
