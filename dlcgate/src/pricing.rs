//! Batched display-price queries for the configured SKUs.

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::{BackendResult, ProductQuote, StoreBackend};

/// Fetches authoritative display prices for a fixed SKU set.
///
/// Quotes are ephemeral: they are logged and handed to the caller for
/// display, never stored.
pub struct PricingQuery {
    backend: Arc<dyn StoreBackend>,
    skus: Vec<String>,
}

impl PricingQuery {
    /// Create a query over the configured SKU set.
    pub fn new(backend: Arc<dyn StoreBackend>, skus: Vec<String>) -> Self {
        Self { backend, skus }
    }

    /// The SKUs this query covers.
    pub fn skus(&self) -> &[String] {
        &self.skus
    }

    /// Fetch quotes for all configured SKUs in one backend call.
    ///
    /// The backend may return fewer quotes than requested (unknown SKUs are
    /// simply absent); that is not an error. An empty SKU set skips the
    /// backend call entirely.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a failed call; no partial results.
    pub async fn fetch_quotes(&self) -> BackendResult<Vec<ProductQuote>> {
        if self.skus.is_empty() {
            debug!("no SKUs configured; skipping price fetch");
            return Ok(Vec::new());
        }

        let quotes = self.backend.quotes(&self.skus).await?;
        for quote in &quotes {
            info!(
                sku = quote.sku,
                name = quote.display_name,
                price = quote.formatted_price,
                "product quote"
            );
        }
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockStoreBackend;

    fn quote(sku: &str, price: &str) -> ProductQuote {
        ProductQuote {
            sku: sku.to_string(),
            display_name: format!("Pack {sku}"),
            formatted_price: price.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_quotes_batches_all_skus() {
        let backend = Arc::new(MockStoreBackend::new());
        backend.set_quotes(vec![quote("pack1", "$4.99"), quote("pack2", "$9.99")]);

        let query = PricingQuery::new(
            backend.clone(),
            vec!["pack1".to_string(), "pack2".to_string()],
        );
        let quotes = query.fetch_quotes().await.unwrap();

        assert_eq!(quotes.len(), 2);
        // One batched call, not one per SKU.
        assert_eq!(backend.calls_of("quotes:pack1,pack2"), 1);
    }

    #[tokio::test]
    async fn test_fewer_quotes_than_requested_is_not_an_error() {
        let backend = Arc::new(MockStoreBackend::new());
        backend.set_quotes(vec![quote("pack1", "$4.99")]);

        let query = PricingQuery::new(
            backend,
            vec!["pack1".to_string(), "unknown".to_string()],
        );
        let quotes = query.fetch_quotes().await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].sku, "pack1");
    }

    #[tokio::test]
    async fn test_empty_sku_set_skips_backend_call() {
        let backend = Arc::new(MockStoreBackend::new());
        let query = PricingQuery::new(backend.clone(), Vec::new());

        let quotes = query.fetch_quotes().await.unwrap();
        assert!(quotes.is_empty());
        assert!(backend.calls().is_empty());
    }
}
