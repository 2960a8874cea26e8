//! The seam between session logic and the network.
//!
//! Session components are generic over [`CatalogGateway`] so they can run
//! against [`GatewayClient`] in production and a scripted double in tests.

use std::future::Future;

use marketlens_core::{AnalyticsOverview, CatalogProduct, SearchResult, TrendPoint};

use crate::client::GatewayClient;
use crate::error::GatewayError;

/// The four backend operations the dashboard core depends on.
///
/// Each call is a single request/response; implementations must not retry
/// and must not cache.
pub trait CatalogGateway: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<SearchResult, GatewayError>> + Send;

    fn sync_item(
        &self,
        asin: &str,
    ) -> impl Future<Output = Result<CatalogProduct, GatewayError>> + Send;

    fn fetch_overview(
        &self,
    ) -> impl Future<Output = Result<AnalyticsOverview, GatewayError>> + Send;

    fn fetch_trends(&self) -> impl Future<Output = Result<Vec<TrendPoint>, GatewayError>> + Send;
}

impl CatalogGateway for GatewayClient {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<SearchResult, GatewayError>> + Send {
        GatewayClient::search(self, query)
    }

    fn sync_item(
        &self,
        asin: &str,
    ) -> impl Future<Output = Result<CatalogProduct, GatewayError>> + Send {
        GatewayClient::sync_item(self, asin)
    }

    fn fetch_overview(
        &self,
    ) -> impl Future<Output = Result<AnalyticsOverview, GatewayError>> + Send {
        GatewayClient::fetch_overview(self)
    }

    fn fetch_trends(&self) -> impl Future<Output = Result<Vec<TrendPoint>, GatewayError>> + Send {
        GatewayClient::fetch_trends(self)
    }
}
