//! Startup reconciliation: download everything owed but not installed.
//!
//! The scheduler has two states. It starts **Waiting** on the catalog's
//! one-shot readiness signal; the first successful catalog fetch moves it to
//! **Reconciling**, where it dispatches a download for every asset the mode
//! selects and then ends. It never loops or re-polls; one scheduler instance
//! performs exactly one pass.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{AssetDescriptor, CatalogStore};
use crate::download::{DownloadError, DownloadHandle, DownloadTracker};

/// Which assets a reconciliation pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Only assets the user is entitled to. Used by the startup pass.
    EntitledOnly,
    /// Every not-yet-installed asset, entitlement ignored. Used by the
    /// sandbox checkout bypass.
    AllAvailable,
}

impl ReconcileMode {
    /// Whether a descriptor is selected under this mode.
    fn selects(self, descriptor: &AssetDescriptor) -> bool {
        if !descriptor.wants_download() {
            return false;
        }
        match self {
            ReconcileMode::EntitledOnly => descriptor.is_entitled(),
            ReconcileMode::AllAvailable => true,
        }
    }
}

/// One-shot bulk download pass gated on catalog readiness.
pub struct ReconcileScheduler {
    catalog: Arc<CatalogStore>,
    tracker: Arc<DownloadTracker>,
    mode: ReconcileMode,
}

impl ReconcileScheduler {
    /// Create a scheduler for one pass in the given mode.
    pub fn new(
        catalog: Arc<CatalogStore>,
        tracker: Arc<DownloadTracker>,
        mode: ReconcileMode,
    ) -> Self {
        Self {
            catalog,
            tracker,
            mode,
        }
    }

    /// Wait for the catalog, then dispatch downloads for every selected
    /// asset.
    ///
    /// Consumes the scheduler: Reconciling is terminal. Returns the handles
    /// of the transfers that were started.
    pub async fn run(self) -> Vec<DownloadHandle> {
        self.catalog.ready().await;
        let handles = dispatch_available(&self.catalog, &self.tracker, self.mode);
        info!(
            mode = ?self.mode,
            dispatched = handles.len(),
            "reconciliation pass complete"
        );
        handles
    }
}

/// Dispatch downloads for every asset the mode selects in the *current*
/// catalog snapshot.
///
/// Does not wait for catalog readiness; an uninitialized catalog dispatches
/// nothing. Transfers already in flight are skipped.
pub fn dispatch_available(
    catalog: &CatalogStore,
    tracker: &DownloadTracker,
    mode: ReconcileMode,
) -> Vec<DownloadHandle> {
    let Some(snapshot) = catalog.snapshot() else {
        debug!("catalog not populated; nothing to dispatch");
        return Vec::new();
    };

    let mut handles = Vec::new();
    for descriptor in snapshot.iter().filter(|d| mode.selects(d)) {
        match tracker.start(&descriptor.asset_id) {
            Ok(handle) => handles.push(handle),
            Err(DownloadError::AlreadyInFlight { asset_id }) => {
                debug!(asset_id, "skipping asset already being transferred");
            }
            Err(err) => {
                warn!(asset_id = descriptor.asset_id, %err, "failed to dispatch download");
            }
        }
    }
    handles
}
