//! Asset descriptor types.
//!
//! An [`AssetDescriptor`] is one downloadable content unit as the storefront
//! reports it, tracked by entitlement and install status.

use serde::{Deserialize, Serialize};

/// Whether the user is authorized to download an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntitlementStatus {
    /// Owned via purchase or free grant.
    Entitled,
    /// Not owned; must be purchased first.
    NotEntitled,
}

/// Local install state of an asset, as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallStatus {
    /// Not present locally.
    NotInstalled,
    /// A transfer is currently running.
    InProgress,
    /// Downloaded and available.
    Installed,
}

/// One purchasable/downloadable asset in the storefront catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Backend identifier used to request the asset download.
    pub asset_id: String,
    /// SKU of the product this asset belongs to.
    pub sku: String,
    /// Entitlement state for the current user.
    pub entitlement: EntitlementStatus,
    /// Install state on this machine.
    pub install: InstallStatus,
}

impl AssetDescriptor {
    /// Whether this asset still needs a download.
    ///
    /// Installed and in-progress assets are excluded; entitlement is a
    /// separate concern decided by the reconciliation mode.
    pub fn wants_download(&self) -> bool {
        !matches!(self.install, InstallStatus::Installed | InstallStatus::InProgress)
    }

    /// Whether the current user owns this asset.
    pub fn is_entitled(&self) -> bool {
        self.entitlement == EntitlementStatus::Entitled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(install: InstallStatus) -> AssetDescriptor {
        AssetDescriptor {
            asset_id: "a1".to_string(),
            sku: "pack1".to_string(),
            entitlement: EntitlementStatus::Entitled,
            install,
        }
    }

    #[test]
    fn test_wants_download_only_when_not_installed() {
        assert!(descriptor(InstallStatus::NotInstalled).wants_download());
        assert!(!descriptor(InstallStatus::InProgress).wants_download());
        assert!(!descriptor(InstallStatus::Installed).wants_download());
    }

    #[test]
    fn test_status_wire_format_is_kebab_case() {
        let json = r#"{
            "asset_id": "a1",
            "sku": "pack1",
            "entitlement": "not-entitled",
            "install": "in-progress"
        }"#;
        let descriptor: AssetDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.entitlement, EntitlementStatus::NotEntitled);
        assert_eq!(descriptor.install, InstallStatus::InProgress);
    }
}
