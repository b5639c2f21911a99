//! SHA-256 digest tracking for asset transfers.
//!
//! Downloads are hashed incrementally as chunks arrive, so verification
//! costs no second pass over the file.

use sha2::{Digest, Sha256};

/// Incremental SHA-256 digest over a streamed download.
#[derive(Default)]
pub struct StreamingDigest {
    hasher: Sha256,
}

impl StreamingDigest {
    /// Create a new, empty digest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of transferred bytes.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Consume the digest and return the lowercase hexadecimal hash.
    pub fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

/// Compare an advertised digest against a computed one.
///
/// Backends are inconsistent about hex casing, so the comparison is
/// case-insensitive.
pub fn digests_match(expected: &str, actual: &str) -> bool {
    expected.eq_ignore_ascii_case(actual)
}
