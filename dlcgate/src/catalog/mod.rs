//! Catalog store: the most recently fetched asset descriptor list.
//!
//! The store is either uninitialized (no fetch has succeeded yet) or holds
//! the complete list from the most recent fetch. Refreshes replace the list
//! wholesale; a failed refresh leaves the previous contents untouched.
//!
//! Readers that must wait for the first population subscribe to a one-shot
//! readiness signal instead of polling; see [`CatalogStore::ready`].

mod descriptor;

pub use descriptor::{AssetDescriptor, EntitlementStatus, InstallStatus};

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::debug;

use crate::backend::{BackendResult, StoreBackend};

/// Shared, process-wide catalog snapshot.
///
/// # Thread Safety
///
/// Mutation happens only inside [`refresh`](Self::refresh); the snapshot is
/// guarded by an `RwLock` so concurrent completions cannot interleave a
/// partial update with a read.
pub struct CatalogStore {
    /// `None` until the first successful fetch, then always the complete
    /// list from the most recent fetch.
    descriptors: RwLock<Option<Vec<AssetDescriptor>>>,

    /// Readiness signal, flipped to `true` exactly once.
    ready_tx: watch::Sender<bool>,
}

impl CatalogStore {
    /// Create an uninitialized store.
    pub fn new() -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            descriptors: RwLock::new(None),
            ready_tx,
        }
    }

    /// Fetch the descriptor list from the backend and replace the store's
    /// contents atomically.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a failed fetch; the store is left
    /// untouched in that case.
    pub async fn refresh(&self, backend: &dyn StoreBackend) -> BackendResult<()> {
        let list = backend.list_descriptors().await?;
        debug!(descriptors = list.len(), "catalog refreshed");
        *self.descriptors.write() = Some(list);
        self.ready_tx.send_replace(true);
        Ok(())
    }

    /// Clone the current descriptor list.
    ///
    /// `None` means the store has never been populated, which is distinct
    /// from `Some(vec![])` (populated, but the catalog is empty).
    pub fn snapshot(&self) -> Option<Vec<AssetDescriptor>> {
        self.descriptors.read().clone()
    }

    /// Whether at least one refresh has succeeded.
    pub fn is_populated(&self) -> bool {
        self.descriptors.read().is_some()
    }

    /// Wait until the store has been populated for the first time.
    ///
    /// Resolves immediately if a refresh has already succeeded. This is the
    /// subscription the reconciliation scheduler blocks on; it never times
    /// out, so it is only correct when a refresh is eventually issued.
    pub async fn ready(&self) {
        let mut rx = self.ready_tx.subscribe();
        // The sender lives inside self, so wait_for cannot fail while the
        // store is borrowed.
        let _ = rx.wait_for(|populated| *populated).await;
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockStoreBackend;

    fn entitled(asset_id: &str, sku: &str) -> AssetDescriptor {
        AssetDescriptor {
            asset_id: asset_id.to_string(),
            sku: sku.to_string(),
            entitlement: EntitlementStatus::Entitled,
            install: InstallStatus::NotInstalled,
        }
    }

    #[test]
    fn test_new_store_is_uninitialized() {
        let store = CatalogStore::new();
        assert!(!store.is_populated());
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_contents_wholesale() {
        let backend = MockStoreBackend::new();
        let store = CatalogStore::new();

        backend.set_descriptors(vec![entitled("a1", "pack1"), entitled("a2", "pack2")]);
        store.refresh(&backend).await.unwrap();
        assert_eq!(store.snapshot().unwrap().len(), 2);

        // Second fetch returns a different list; no merge with prior state.
        backend.set_descriptors(vec![entitled("a3", "pack3")]);
        store.refresh(&backend).await.unwrap();
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].asset_id, "a3");
    }

    #[tokio::test]
    async fn test_empty_catalog_is_populated() {
        let backend = MockStoreBackend::new();
        let store = CatalogStore::new();

        store.refresh(&backend).await.unwrap();
        assert!(store.is_populated());
        assert_eq!(store.snapshot(), Some(vec![]));
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_store_untouched() {
        let backend = MockStoreBackend::new();
        let store = CatalogStore::new();

        backend.set_descriptors(vec![entitled("a1", "pack1")]);
        store.refresh(&backend).await.unwrap();

        backend.fail_catalog(true);
        assert!(store.refresh(&backend).await.is_err());

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].asset_id, "a1");
    }

    #[tokio::test]
    async fn test_failed_refresh_does_not_signal_ready() {
        let backend = MockStoreBackend::new();
        backend.fail_catalog(true);
        let store = CatalogStore::new();

        assert!(store.refresh(&backend).await.is_err());
        assert!(!store.is_populated());
    }

    #[tokio::test]
    async fn test_ready_resolves_after_first_population() {
        let backend = MockStoreBackend::new();
        let store = std::sync::Arc::new(CatalogStore::new());

        let waiter = {
            let store = store.clone();
            tokio::spawn(async move { store.ready().await })
        };

        store.refresh(&backend).await.unwrap();
        waiter.await.unwrap();

        // Resolves immediately once populated.
        store.ready().await;
    }
}
