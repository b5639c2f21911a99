//! Wire types produced by the storefront backend.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Display price for one purchasable product.
///
/// Ephemeral: produced by a pricing query, logged or displayed, never
/// retained by the coordinator. The price string is pre-formatted by the
/// backend in the user's currency; no economic logic happens on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuote {
    /// Stable identifier of the purchasable product.
    pub sku: String,
    /// Human-readable product name.
    pub display_name: String,
    /// Price formatted for display, e.g. `"$4.99"`.
    pub formatted_price: String,
}

/// One entry in the backend's purchase ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// SKU of the purchased product.
    pub sku: String,
    /// When the entitlement was granted, as seconds since the Unix epoch.
    pub grant_time: u64,
    /// Backend identifier of the purchase; also the key used to request the
    /// corresponding asset download.
    pub purchase_id: String,
}

/// Terminal result of one completed asset download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    /// Where the asset file landed on local storage.
    pub local_path: PathBuf,
    /// Total bytes written.
    pub bytes_transferred: u64,
}

/// Advisory progress of one in-flight transfer.
///
/// Emitted zero or more times before the terminal [`DownloadResult`] or
/// error. `bytes_total` is 0 when the backend did not advertise a size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes transferred so far.
    pub bytes_transferred: u64,
    /// Expected total bytes, or 0 if unknown.
    pub bytes_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_quote_deserialize() {
        let json = r#"{"sku":"pack1","display_name":"Map Pack 1","formatted_price":"$4.99"}"#;
        let quote: ProductQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.sku, "pack1");
        assert_eq!(quote.display_name, "Map Pack 1");
        assert_eq!(quote.formatted_price, "$4.99");
    }

    #[test]
    fn test_purchase_record_deserialize() {
        let json = r#"{"sku":"pack1","grant_time":1724630400,"purchase_id":"pur-77"}"#;
        let record: PurchaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.purchase_id, "pur-77");
        assert_eq!(record.grant_time, 1_724_630_400);
    }

    #[test]
    fn test_transfer_progress_default_is_zero() {
        let progress = TransferProgress::default();
        assert_eq!(progress.bytes_transferred, 0);
        assert_eq!(progress.bytes_total, 0);
    }
}
