//! Handle to one in-flight download.

use tokio::sync::{oneshot, watch};

use super::{DownloadError, DownloadOutcome};
use crate::backend::TransferProgress;

/// Observer for one spawned transfer.
///
/// The handle is purely observational: dropping it does not cancel the
/// transfer, and the registration/refresh side effects run on the transfer
/// task whether or not anyone is watching.
pub struct DownloadHandle {
    asset_id: String,
    progress: watch::Receiver<TransferProgress>,
    done: oneshot::Receiver<DownloadOutcome>,
}

impl DownloadHandle {
    pub(super) fn new(
        asset_id: String,
        progress: watch::Receiver<TransferProgress>,
        done: oneshot::Receiver<DownloadOutcome>,
    ) -> Self {
        Self {
            asset_id,
            progress,
            done,
        }
    }

    /// Identifier of the asset being transferred.
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Advisory progress stream for this transfer.
    ///
    /// The receiver holds the latest [`TransferProgress`] and terminates
    /// (sender dropped) when the terminal result arrives. Ignoring it never
    /// affects the transfer.
    pub fn progress(&self) -> watch::Receiver<TransferProgress> {
        self.progress.clone()
    }

    /// Wait for the terminal result of the transfer.
    pub async fn wait(self) -> DownloadOutcome {
        match self.done.await {
            Ok(outcome) => outcome,
            // The transfer task can only go away on runtime shutdown.
            Err(_) => Err(DownloadError::TaskLost {
                asset_id: self.asset_id,
            }),
        }
    }
}

impl std::fmt::Debug for DownloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadHandle")
            .field("asset_id", &self.asset_id)
            .finish_non_exhaustive()
    }
}
