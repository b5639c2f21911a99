//! DLCGate - Entitlement-gated add-on content for the OTH Studios runtime
//!
//! This library coordinates purchase and delivery of downloadable add-on
//! content sold through a remote storefront. It fetches the asset catalog,
//! queries display prices, drives checkout, downloads purchased asset files
//! and publishes each downloaded file to the runtime resource index under a
//! content-addressable key.
//!
//! # Architecture
//!
//! ```text
//! StoreApp (bootstrap)
//!     │
//!     ├── CatalogStore ──────── descriptor snapshot + readiness signal
//!     ├── PricingQuery ──────── batched display-price fetch
//!     ├── PurchaseInitiator ─── checkout → download chain (sandbox bypass)
//!     ├── DownloadTracker ───── per-asset transfers + progress channels
//!     ├── ResourceRegistry ──── logical key → local path index
//!     └── ReconcileScheduler ── startup pass over entitled assets
//! ```
//!
//! All storefront traffic goes through the [`backend::StoreBackend`] trait;
//! [`backend::HttpStoreBackend`] is the production implementation.

pub mod app;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod download;
pub mod pricing;
pub mod purchase;
pub mod reconcile;
pub mod registry;
pub mod telemetry;

pub use app::{AppConfig, StoreApp};
pub use backend::{BackendError, StoreBackend};
pub use catalog::{AssetDescriptor, CatalogStore, EntitlementStatus, InstallStatus};
pub use download::{DownloadError, DownloadHandle, DownloadTracker, TransferProgress};
pub use registry::{LocatorEntry, RegistryError, ResourceRegistry};
