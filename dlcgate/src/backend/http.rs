//! HTTP implementation of the storefront backend.
//!
//! Talks to the remote store over a small JSON API and streams asset files
//! to the configured download directory, publishing advisory progress and
//! verifying the advertised SHA-256 digest when one is present.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::checksum::{digests_match, StreamingDigest};
use super::{
    BackendError, BackendResult, BoxFuture, DownloadResult, ProductQuote, ProgressSender,
    PurchaseRecord, StoreBackend, TransferProgress,
};
use crate::catalog::AssetDescriptor;

/// Default timeout for request/response API calls.
///
/// Downloads are exempt: a transfer may take arbitrary time.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Response header naming the asset file.
const FILENAME_HEADER: &str = "x-dlc-filename";

/// Response header carrying the expected SHA-256 digest, when the backend
/// has one.
const DIGEST_HEADER: &str = "x-dlc-sha256";

/// Storefront backend over HTTP.
pub struct HttpStoreBackend {
    client: Client,
    base_url: String,
    download_dir: PathBuf,
    timeout: Duration,
    checkout_enabled: bool,
}

impl HttpStoreBackend {
    /// Create a backend for the given store URL, downloading into
    /// `download_dir`.
    ///
    /// # Panics
    ///
    /// Panics if the `reqwest::Client` builder fails to build.
    pub fn new(base_url: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        let client = Client::builder()
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            download_dir: download_dir.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            checkout_enabled: true,
        }
    }

    /// Set the request timeout for non-download calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Mark checkout as unavailable (sandbox/development context).
    pub fn with_checkout_enabled(mut self, enabled: bool) -> Self {
        self.checkout_enabled = enabled;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, op: &'static str, url: String) -> BackendResult<T> {
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| BackendError::Request {
                op,
                reason: e.to_string(),
            })?;
        Self::decode_json(op, response).await
    }

    async fn decode_json<T: DeserializeOwned>(
        op: &'static str,
        response: Response,
    ) -> BackendResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                op,
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(|e| BackendError::Decode {
            op,
            reason: e.to_string(),
        })
    }

    /// Stream one asset file to disk, reporting progress per chunk.
    async fn stream_to_disk(
        &self,
        asset_id: &str,
        progress: ProgressSender,
    ) -> BackendResult<DownloadResult> {
        const OP: &str = "download";

        let url = self.endpoint(&format!("/v1/assets/{asset_id}/file"));
        // No overall timeout here: transfers run as long as they need.
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Request {
                op: OP,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                op: OP,
                status: status.as_u16(),
            });
        }

        let bytes_total = response.content_length().unwrap_or(0);
        let filename = response
            .headers()
            .get(FILENAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("{asset_id}.bin"));
        let expected_digest = response
            .headers()
            .get(DIGEST_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| BackendError::Io {
                path: self.download_dir.clone(),
                source: e,
            })?;
        let local_path = self.download_dir.join(&filename);
        let mut file = tokio::fs::File::create(&local_path)
            .await
            .map_err(|e| BackendError::Io {
                path: local_path.clone(),
                source: e,
            })?;

        debug!(asset_id, path = %local_path.display(), bytes_total, "transfer started");

        let mut digest = StreamingDigest::new();
        let mut bytes_transferred = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| BackendError::Request {
                op: OP,
                reason: e.to_string(),
            })?;
            digest.update(&chunk);
            file.write_all(&chunk)
                .await
                .map_err(|e| BackendError::Io {
                    path: local_path.clone(),
                    source: e,
                })?;
            bytes_transferred += chunk.len() as u64;
            let _ = progress.send(TransferProgress {
                bytes_transferred,
                bytes_total,
            });
        }
        file.flush().await.map_err(|e| BackendError::Io {
            path: local_path.clone(),
            source: e,
        })?;

        if let Some(expected) = expected_digest {
            enforce_digest(&local_path, &filename, &expected, digest.finish()).await?;
        }

        Ok(DownloadResult {
            local_path,
            bytes_transferred,
        })
    }
}

impl StoreBackend for HttpStoreBackend {
    fn list_descriptors(&self) -> BoxFuture<'_, BackendResult<Vec<AssetDescriptor>>> {
        let url = self.endpoint("/v1/assets");
        Box::pin(self.get_json("list_descriptors", url))
    }

    fn quotes<'a>(&'a self, skus: &'a [String]) -> BoxFuture<'a, BackendResult<Vec<ProductQuote>>> {
        let url = self.endpoint(&format!("/v1/products?skus={}", skus.join(",")));
        Box::pin(self.get_json("quotes", url))
    }

    fn purchases(&self) -> BoxFuture<'_, BackendResult<Vec<PurchaseRecord>>> {
        let url = self.endpoint("/v1/purchases");
        Box::pin(self.get_json("purchases", url))
    }

    fn purchase<'a>(&'a self, sku: &'a str) -> BoxFuture<'a, BackendResult<PurchaseRecord>> {
        let url = self.endpoint("/v1/checkout");
        Box::pin(async move {
            const OP: &str = "purchase";
            let response = self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(&serde_json::json!({ "sku": sku }))
                .send()
                .await
                .map_err(|e| BackendError::Request {
                    op: OP,
                    reason: e.to_string(),
                })?;
            Self::decode_json(OP, response).await
        })
    }

    fn download<'a>(
        &'a self,
        asset_id: &'a str,
        progress: ProgressSender,
    ) -> BoxFuture<'a, BackendResult<DownloadResult>> {
        Box::pin(self.stream_to_disk(asset_id, progress))
    }

    fn supports_checkout(&self) -> bool {
        self.checkout_enabled
    }
}

/// Fail the transfer when the advertised digest does not match the computed
/// one, leaving no unverifiable file behind.
async fn enforce_digest(
    path: &Path,
    filename: &str,
    expected: &str,
    actual: String,
) -> BackendResult<()> {
    if digests_match(expected, &actual) {
        return Ok(());
    }
    let _ = tokio::fs::remove_file(path).await;
    Err(BackendError::ChecksumMismatch {
        filename: filename.to_string(),
        expected: expected.to_string(),
        actual,
    })
}

/// Strip any path components from a backend-supplied filename.
///
/// The header value is untrusted; only its final component (separators
/// normalized) may name the file on disk.
fn sanitize_filename(name: &str) -> String {
    let normalized = name.replace('\\', "/");
    normalized
        .rsplit('/')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
