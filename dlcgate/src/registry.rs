//! Resource registry: logical key → local file path index.
//!
//! The runtime loader resolves downloaded assets by logical key. The key is
//! derived deterministically from the final component of the local file path
//! (platform separators normalized first), matching how asset bundles are
//! addressed by filename.
//!
//! # Design Principles
//!
//! - **Explicit lifetime**: the registry is an owned object shared by
//!   `Arc` handle, not ambient global state
//! - **Append-only**: entries are never removed; re-registering the same
//!   path is an idempotent no-op
//! - **Collisions are errors**: two different files with the same final
//!   path component must never silently shadow each other

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors from resource registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The path has no usable final component (empty, or ends in a
    /// separator).
    #[error("cannot derive a resource key from {path}")]
    EmptyKey { path: PathBuf },

    /// The derived key already maps to a different file.
    #[error("resource key {key} already maps to {existing}; refusing {candidate}",
            existing = .existing.display(), candidate = .candidate.display())]
    KeyCollision {
        key: String,
        existing: PathBuf,
        candidate: PathBuf,
    },

    /// A directory scan failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One published (logical key, local path) mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorEntry {
    /// Key the runtime loader resolves by.
    pub key: String,
    /// Local file the key maps to.
    pub path: PathBuf,
}

/// Process-wide index from logical key to local file path.
///
/// Shared between the download tracker (writer) and the runtime loader
/// collaborator (reader). `DashMap` gives the single-writer-per-key
/// discipline required when download completions land concurrently.
pub struct ResourceRegistry {
    entries: DashMap<String, PathBuf>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Publish a downloaded file under its derived logical key.
    ///
    /// Re-registering the same path is idempotent and returns the existing
    /// entry, so re-downloading an asset never corrupts the index.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::EmptyKey`] when no key can be derived
    /// - [`RegistryError::KeyCollision`] when the key already maps to a
    ///   different path
    pub fn register(&self, path: impl Into<PathBuf>) -> RegistryResult<LocatorEntry> {
        let path = path.into();
        let key = derive_key(&path).ok_or_else(|| RegistryError::EmptyKey { path: path.clone() })?;

        match self.entries.entry(key.clone()) {
            dashmap::Entry::Occupied(existing) => {
                if existing.get() == &path {
                    debug!(key, path = %path.display(), "resource already registered");
                    Ok(LocatorEntry { key, path })
                } else {
                    Err(RegistryError::KeyCollision {
                        key,
                        existing: existing.get().clone(),
                        candidate: path,
                    })
                }
            }
            dashmap::Entry::Vacant(slot) => {
                slot.insert(path.clone());
                debug!(key, path = %path.display(), "resource registered");
                Ok(LocatorEntry { key, path })
            }
        }
    }

    /// Publish every regular file already present in `dir`.
    ///
    /// Rebuilds the index from a download directory that survived a previous
    /// run; subdirectories are not descended into. Returns the number of
    /// entries published.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Io`] when the directory cannot be read
    /// - Key errors from [`register`](Self::register) for individual files
    pub async fn publish_dir(&self, dir: &Path) -> RegistryResult<usize> {
        let io_err = |e| RegistryError::Io {
            path: dir.to_path_buf(),
            source: e,
        };

        let mut reader = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        let mut published = 0;
        while let Some(entry) = reader.next_entry().await.map_err(io_err)? {
            if !entry.file_type().await.map_err(io_err)?.is_file() {
                continue;
            }
            self.register(entry.path())?;
            published += 1;
        }
        Ok(published)
    }

    /// Resolve a logical key to its local file path.
    pub fn resolve(&self, key: &str) -> Option<PathBuf> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    /// Number of published entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been published yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all published entries, for display.
    pub fn entries(&self) -> Vec<LocatorEntry> {
        self.entries
            .iter()
            .map(|entry| LocatorEntry {
                key: entry.key().clone(),
                path: entry.value().clone(),
            })
            .collect()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the logical key from a local file path.
///
/// Backslashes are normalized to forward slashes before splitting, so paths
/// reported by a Windows-hosted backend derive the same key as native ones.
/// Returns `None` when the final component is empty.
pub fn derive_key(path: &Path) -> Option<String> {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let last = normalized.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}
