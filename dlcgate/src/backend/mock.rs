//! Scriptable in-memory backend for coordinator tests.
//!
//! Records every call it receives so tests can assert how often (and for
//! what) the coordinator hit the service boundary.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::{
    BackendError, BackendResult, BoxFuture, DownloadResult, ProductQuote, ProgressSender,
    PurchaseRecord, StoreBackend, TransferProgress,
};
use crate::catalog::AssetDescriptor;

/// Test double for the storefront backend.
///
/// Unconfigured operations fail with a `Request` error, which is how tests
/// exercise the coordinator's failure paths.
#[derive(Default)]
pub struct MockStoreBackend {
    descriptors: Mutex<Vec<AssetDescriptor>>,
    quotes: Mutex<Vec<ProductQuote>>,
    purchases: Mutex<Vec<PurchaseRecord>>,
    /// sku -> granted record; missing means checkout fails.
    grants: Mutex<HashMap<String, PurchaseRecord>>,
    /// asset id -> local path; missing means the transfer fails.
    downloads: Mutex<HashMap<String, PathBuf>>,
    download_delay: Mutex<Option<Duration>>,
    fail_catalog: AtomicBool,
    checkout_disabled: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MockStoreBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_descriptors(&self, descriptors: Vec<AssetDescriptor>) {
        *self.descriptors.lock() = descriptors;
    }

    pub fn set_quotes(&self, quotes: Vec<ProductQuote>) {
        *self.quotes.lock() = quotes;
    }

    pub fn set_purchases(&self, purchases: Vec<PurchaseRecord>) {
        *self.purchases.lock() = purchases;
    }

    /// Make checkout for `sku` succeed with the given record.
    pub fn set_grant(&self, sku: &str, record: PurchaseRecord) {
        self.grants.lock().insert(sku.to_string(), record);
    }

    /// Make downloads of `asset_id` succeed, landing at `path`.
    pub fn set_download(&self, asset_id: &str, path: &str) {
        self.downloads
            .lock()
            .insert(asset_id.to_string(), PathBuf::from(path));
    }

    /// Hold every transfer open for `delay` before completing.
    pub fn set_download_delay(&self, delay: Duration) {
        *self.download_delay.lock() = Some(delay);
    }

    /// Make `list_descriptors` fail.
    pub fn fail_catalog(&self, fail: bool) {
        self.fail_catalog.store(fail, Ordering::SeqCst);
    }

    /// Report checkout as unsupported (the sandbox context).
    pub fn disable_checkout(&self) {
        self.checkout_disabled.store(true, Ordering::SeqCst);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// How many times a given call was received.
    pub fn calls_of(&self, op: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == op).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn failed(op: &'static str) -> BackendError {
        BackendError::Request {
            op,
            reason: "mock backend failure".to_string(),
        }
    }
}

impl StoreBackend for MockStoreBackend {
    fn list_descriptors(&self) -> BoxFuture<'_, BackendResult<Vec<AssetDescriptor>>> {
        self.record("list_descriptors");
        let result = if self.fail_catalog.load(Ordering::SeqCst) {
            Err(Self::failed("list_descriptors"))
        } else {
            Ok(self.descriptors.lock().clone())
        };
        Box::pin(async move { result })
    }

    fn quotes<'a>(&'a self, skus: &'a [String]) -> BoxFuture<'a, BackendResult<Vec<ProductQuote>>> {
        self.record(format!("quotes:{}", skus.join(",")));
        // Like the real backend: quotes only for products that exist.
        let quotes = self
            .quotes
            .lock()
            .iter()
            .filter(|q| skus.contains(&q.sku))
            .cloned()
            .collect();
        Box::pin(async move { Ok(quotes) })
    }

    fn purchases(&self) -> BoxFuture<'_, BackendResult<Vec<PurchaseRecord>>> {
        self.record("purchases");
        let purchases = self.purchases.lock().clone();
        Box::pin(async move { Ok(purchases) })
    }

    fn purchase<'a>(&'a self, sku: &'a str) -> BoxFuture<'a, BackendResult<PurchaseRecord>> {
        self.record(format!("purchase:{sku}"));
        let result = self
            .grants
            .lock()
            .get(sku)
            .cloned()
            .ok_or_else(|| Self::failed("purchase"));
        Box::pin(async move { result })
    }

    fn download<'a>(
        &'a self,
        asset_id: &'a str,
        progress: ProgressSender,
    ) -> BoxFuture<'a, BackendResult<DownloadResult>> {
        self.record(format!("download:{asset_id}"));
        let path = self.downloads.lock().get(asset_id).cloned();
        let delay = *self.download_delay.lock();

        Box::pin(async move {
            let Some(path) = path else {
                return Err(Self::failed("download"));
            };

            let total = 100;
            let _ = progress.send(TransferProgress {
                bytes_transferred: 50,
                bytes_total: total,
            });
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let _ = progress.send(TransferProgress {
                bytes_transferred: total,
                bytes_total: total,
            });

            Ok(DownloadResult {
                local_path: path,
                bytes_transferred: total,
            })
        })
    }

    fn supports_checkout(&self) -> bool {
        !self.checkout_disabled.load(Ordering::SeqCst)
    }
}
