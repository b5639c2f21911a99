//! Application bootstrap implementation.
//!
//! `StoreApp` wires the shared coordinator state together and runs the
//! startup sequence: the reconciliation scheduler subscribes to catalog
//! readiness *before* the first catalog fetch is issued, so the bulk
//! download pass can never miss the population signal.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::AppConfig;
use crate::backend::{HttpStoreBackend, StoreBackend};
use crate::catalog::CatalogStore;
use crate::download::{DownloadHandle, DownloadTracker};
use crate::pricing::PricingQuery;
use crate::purchase::PurchaseInitiator;
use crate::reconcile::{ReconcileMode, ReconcileScheduler};
use crate::registry::ResourceRegistry;

/// The entitlement and download coordinator, assembled.
///
/// Owns the process-wide catalog snapshot, resource index and download
/// tracker; hands out per-operation components wired to them.
///
/// # Startup
///
/// [`start`](Self::start) runs the same sequence the runtime performs on
/// boot: subscribe reconciliation, fire the price query and the purchase
/// ledger listing, then issue the initial catalog fetch that unblocks
/// reconciliation. If that fetch fails, reconciliation stays pending until
/// some later refresh succeeds (there is no retry policy here).
pub struct StoreApp {
    config: AppConfig,
    backend: Arc<dyn StoreBackend>,
    catalog: Arc<CatalogStore>,
    registry: Arc<ResourceRegistry>,
    tracker: Arc<DownloadTracker>,
}

impl StoreApp {
    /// Build the app over the HTTP backend described by `config`.
    pub fn new(config: AppConfig) -> Self {
        let backend = Arc::new(
            HttpStoreBackend::new(&config.backend_url, &config.download_dir)
                .with_checkout_enabled(!config.sandbox),
        );
        Self::with_backend(config, backend)
    }

    /// Build the app over an explicit backend.
    ///
    /// This is the seam tests use to substitute a mock.
    pub fn with_backend(config: AppConfig, backend: Arc<dyn StoreBackend>) -> Self {
        let catalog = Arc::new(CatalogStore::new());
        let registry = Arc::new(ResourceRegistry::new());
        let tracker = Arc::new(DownloadTracker::new(
            Arc::clone(&backend),
            Arc::clone(&registry),
            Arc::clone(&catalog),
        ));

        Self {
            config,
            backend,
            catalog,
            registry,
            tracker,
        }
    }

    /// Run the startup sequence.
    ///
    /// Returns the join handle of the entitled-only reconciliation pass; it
    /// yields the download handles the pass dispatched once the catalog has
    /// populated.
    pub async fn start(&self) -> JoinHandle<Vec<DownloadHandle>> {
        info!(backend = self.config.backend_url, "starting store coordinator");

        // Subscribe before the first fetch so the readiness signal cannot
        // be missed.
        let reconcile = tokio::spawn(
            ReconcileScheduler::new(
                Arc::clone(&self.catalog),
                Arc::clone(&self.tracker),
                ReconcileMode::EntitledOnly,
            )
            .run(),
        );

        // Independent startup passes; failures are logged and the
        // operations simply terminate.
        let pricing = self.pricing();
        tokio::spawn(async move {
            if let Err(err) = pricing.fetch_quotes().await {
                error!(%err, "price fetch failed");
            }
        });
        let purchaser = self.purchaser();
        tokio::spawn(async move {
            if let Err(err) = purchaser.fetch_purchases().await {
                error!(%err, "purchase ledger fetch failed");
            }
        });

        if let Err(err) = self.catalog.refresh(self.backend.as_ref()).await {
            error!(%err, "initial catalog fetch failed");
        }

        reconcile
    }

    /// The configuration the app was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The backend all components talk through.
    pub fn backend(&self) -> &Arc<dyn StoreBackend> {
        &self.backend
    }

    /// The shared catalog store.
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// The shared resource index consumed by the runtime loader.
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// The shared download tracker.
    pub fn tracker(&self) -> &Arc<DownloadTracker> {
        &self.tracker
    }

    /// Pricing query over the configured SKUs.
    pub fn pricing(&self) -> PricingQuery {
        PricingQuery::new(Arc::clone(&self.backend), self.config.skus.clone())
    }

    /// Purchase initiator wired to the shared state.
    pub fn purchaser(&self) -> PurchaseInitiator {
        PurchaseInitiator::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.catalog),
            Arc::clone(&self.tracker),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockStoreBackend;
    use crate::backend::PurchaseRecord;
    use crate::catalog::{AssetDescriptor, EntitlementStatus, InstallStatus};

    fn descriptor(
        asset_id: &str,
        sku: &str,
        entitlement: EntitlementStatus,
        install: InstallStatus,
    ) -> AssetDescriptor {
        AssetDescriptor {
            asset_id: asset_id.to_string(),
            sku: sku.to_string(),
            entitlement,
            install,
        }
    }

    fn app_config() -> AppConfig {
        AppConfig::new("https://store.example/api", "/tmp/assets")
            .with_skus(vec!["pack1".to_string()])
    }

    #[tokio::test]
    async fn test_startup_sequence_downloads_entitled_assets() {
        let backend = Arc::new(MockStoreBackend::new());
        backend.set_descriptors(vec![
            descriptor(
                "a1",
                "pack1",
                EntitlementStatus::Entitled,
                InstallStatus::NotInstalled,
            ),
            descriptor(
                "a2",
                "pack2",
                EntitlementStatus::NotEntitled,
                InstallStatus::NotInstalled,
            ),
        ]);
        backend.set_download("a1", "/tmp/pack1.bin");
        backend.set_purchases(vec![PurchaseRecord {
            sku: "pack1".to_string(),
            grant_time: 1_724_630_400,
            purchase_id: "pur-1".to_string(),
        }]);

        let app = StoreApp::with_backend(app_config(), backend.clone());
        let reconcile = app.start().await;

        let handles = reconcile.await.unwrap();
        assert_eq!(handles.len(), 1);
        for handle in handles {
            handle.wait().await.unwrap();
        }

        // Entitled asset downloaded and published; unowned asset skipped.
        assert!(app.registry().resolve("pack1.bin").is_some());
        assert_eq!(backend.calls_of("download:a1"), 1);
        assert_eq!(backend.calls_of("download:a2"), 0);

        // The independent startup passes each hit the backend once.
        assert_eq!(backend.calls_of("quotes:pack1"), 1);
        assert_eq!(backend.calls_of("purchases"), 1);
    }

    #[tokio::test]
    async fn test_failed_initial_fetch_leaves_reconciliation_pending() {
        let backend = Arc::new(MockStoreBackend::new());
        backend.fail_catalog(true);

        let app = StoreApp::with_backend(app_config(), backend.clone());
        let reconcile = app.start().await;

        assert!(!app.catalog().is_populated());

        // A later successful refresh unblocks the pass.
        backend.fail_catalog(false);
        app.catalog().refresh(backend.as_ref()).await.unwrap();

        let handles = reconcile.await.unwrap();
        assert!(handles.is_empty());
    }
}
