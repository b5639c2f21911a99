//! Storefront and asset-delivery backend abstraction.
//!
//! The coordinator never talks to the remote store directly; everything goes
//! through the [`StoreBackend`] trait. The production implementation is
//! [`HttpStoreBackend`]; tests substitute a mock.
//!
//! # Design Principles
//!
//! - **Single boundary**: catalog, pricing, checkout, purchase ledger and
//!   binary delivery are one external service from the coordinator's view
//! - **One failure kind**: every failed call surfaces as [`BackendError`];
//!   the coordinator does not distinguish transient from permanent causes
//! - **Dyn-compatible**: async methods return `Pin<Box<dyn Future>>` so the
//!   trait can be used as `Arc<dyn StoreBackend>`

mod checksum;
mod http;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpStoreBackend;
pub use types::{DownloadResult, ProductQuote, PurchaseRecord, TransferProgress};

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use thiserror::Error;
use tokio::sync::watch;

use crate::catalog::AssetDescriptor;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sender half of the advisory progress channel handed to `download()`.
///
/// The backend publishes [`TransferProgress`] updates on this channel for the
/// lifetime of one transfer. Dropping the sender terminates the stream, which
/// is how consumers observe that the terminal result has arrived.
pub type ProgressSender = watch::Sender<TransferProgress>;

/// Errors from failed backend calls.
///
/// The variants describe transport detail for logging; coordinator policy
/// treats them uniformly (log, terminate the operation, no retry).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the connection failed.
    #[error("{op} request failed: {reason}")]
    Request { op: &'static str, reason: String },

    /// The backend answered with a non-success HTTP status.
    #[error("{op} returned HTTP {status}")]
    UnexpectedStatus { op: &'static str, status: u16 },

    /// The response body could not be decoded.
    #[error("failed to decode {op} response: {reason}")]
    Decode { op: &'static str, reason: String },

    /// Writing a downloaded file to disk failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The downloaded file did not match the digest the backend advertised.
    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },
}

/// Interface to the remote transaction/delivery backend.
///
/// All methods are asynchronous request/response operations against the
/// external service boundary. No method blocks a thread; completion is
/// delivered when the returned future resolves.
pub trait StoreBackend: Send + Sync {
    /// Fetch the full list of purchasable/downloadable asset descriptors.
    fn list_descriptors(&self) -> BoxFuture<'_, BackendResult<Vec<AssetDescriptor>>>;

    /// Fetch display prices for the given SKUs in one batched call.
    ///
    /// The backend may return fewer quotes than requested; that is not an
    /// error.
    fn quotes<'a>(&'a self, skus: &'a [String]) -> BoxFuture<'a, BackendResult<Vec<ProductQuote>>>;

    /// List the purchases already granted to the current user.
    fn purchases(&self) -> BoxFuture<'_, BackendResult<Vec<PurchaseRecord>>>;

    /// Run the checkout flow for one SKU.
    ///
    /// User cancellation and payment decline surface as [`BackendError`]
    /// like any other failure.
    fn purchase<'a>(&'a self, sku: &'a str) -> BoxFuture<'a, BackendResult<PurchaseRecord>>;

    /// Download one asset file to local storage.
    ///
    /// Progress updates are published on `progress` while the transfer is in
    /// flight; they are advisory and may be ignored. The sender is dropped
    /// when the future resolves.
    fn download<'a>(
        &'a self,
        asset_id: &'a str,
        progress: ProgressSender,
    ) -> BoxFuture<'a, BackendResult<DownloadResult>>;

    /// Whether this execution context can run the checkout flow.
    ///
    /// Development/sandbox builds report `false`; the purchase initiator
    /// then falls back to downloading everything available instead of
    /// attempting a transaction that cannot complete.
    fn supports_checkout(&self) -> bool;
}
