//! Product routes: marketplace search, sync, and catalog reads.

use marketlens_core::{CatalogProduct, PricePoint, SearchResult};
use reqwest::Method;

use super::GatewayClient;
use crate::error::GatewayError;

impl GatewayClient {
    /// Searches the external marketplace.
    ///
    /// Calls `GET /api/v1/products/search/amazon?query=<q>`. A zero
    /// `total_results` is returned as-is; deciding what it means is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::UnexpectedStatus`] for any non-2xx response.
    /// - [`GatewayError::Http`] on network failure or timeout.
    /// - [`GatewayError::Deserialize`] if the body is not a search result.
    pub async fn search(&self, query: &str) -> Result<SearchResult, GatewayError> {
        let url = self.endpoint(&["products", "search", "amazon"], &[("query", query)])?;
        let context = format!("search(query={query:?})");
        self.request_json(Method::GET, url, &context).await
    }

    /// Imports or refreshes one marketplace product into the catalog.
    ///
    /// Calls `POST /api/v1/products/sync/{asin}` and returns the stored
    /// record. Safe to call repeatedly for the same identifier.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::UnexpectedStatus`] for any non-2xx response.
    /// - [`GatewayError::Http`] on network failure or timeout.
    /// - [`GatewayError::Deserialize`] if the body is not a product record.
    pub async fn sync_item(&self, asin: &str) -> Result<CatalogProduct, GatewayError> {
        let url = self.endpoint(&["products", "sync", asin], &[])?;
        let context = format!("sync(asin={asin})");
        self.request_json(Method::POST, url, &context).await
    }

    /// Lists catalog products, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayClient::search`].
    pub async fn list_products(
        &self,
        category: Option<&str>,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<CatalogProduct>, GatewayError> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let mut params = vec![("skip", skip.as_str()), ("limit", limit.as_str())];
        if let Some(c) = category {
            params.push(("category", c));
        }
        // Trailing empty segment: the collection route is `/products/`.
        let url = self.endpoint(&["products", ""], &params)?;
        self.request_json(Method::GET, url, "list_products").await
    }

    /// Fetches one catalog product by identifier.
    ///
    /// # Errors
    ///
    /// [`GatewayError::UnexpectedStatus`] with status 404 when the product
    /// is not in the catalog; otherwise as [`GatewayClient::search`].
    pub async fn fetch_product(&self, asin: &str) -> Result<CatalogProduct, GatewayError> {
        let url = self.endpoint(&["products", asin], &[])?;
        let context = format!("product(asin={asin})");
        self.request_json(Method::GET, url, &context).await
    }

    /// Fetches the most recent recorded prices for a product, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayClient::search`].
    pub async fn fetch_price_history(&self, asin: &str) -> Result<Vec<PricePoint>, GatewayError> {
        let url = self.endpoint(&["products", asin, "price-history"], &[])?;
        let context = format!("price_history(asin={asin})");
        self.request_json(Method::GET, url, &context).await
    }
}
