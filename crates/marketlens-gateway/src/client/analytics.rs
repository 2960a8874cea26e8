//! Read-only analytics routes.

use marketlens_core::{AnalyticsOverview, TopMetric, TopProduct, TrendPoint};
use reqwest::Method;

use super::GatewayClient;
use crate::error::GatewayError;

impl GatewayClient {
    /// Fetches the dashboard overview numbers.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::UnexpectedStatus`] for any non-2xx response.
    /// - [`GatewayError::Http`] on network failure or timeout.
    /// - [`GatewayError::Deserialize`] if the body does not match.
    pub async fn fetch_overview(&self) -> Result<AnalyticsOverview, GatewayError> {
        let url = self.endpoint(&["analytics", "overview"], &[])?;
        self.request_json(Method::GET, url, "analytics overview")
            .await
    }

    /// Fetches daily trends over the backend's default window.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayClient::fetch_overview`].
    pub async fn fetch_trends(&self) -> Result<Vec<TrendPoint>, GatewayError> {
        let url = self.endpoint(&["analytics", "trends"], &[])?;
        self.request_json(Method::GET, url, "analytics trends").await
    }

    /// Fetches daily trends over the last `days` days.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayClient::fetch_overview`]. The backend rejects
    /// windows outside 7–365 days with a 422.
    pub async fn fetch_trends_window(&self, days: u32) -> Result<Vec<TrendPoint>, GatewayError> {
        let days = days.to_string();
        let url = self.endpoint(&["analytics", "trends"], &[("days", days.as_str())])?;
        self.request_json(Method::GET, url, "analytics trends").await
    }

    /// Fetches the top `limit` products by `metric` over the last `days` days.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayClient::fetch_overview`].
    pub async fn fetch_top_products(
        &self,
        metric: TopMetric,
        limit: u32,
        days: u32,
    ) -> Result<Vec<TopProduct>, GatewayError> {
        let limit = limit.to_string();
        let days = days.to_string();
        let url = self.endpoint(
            &["analytics", "top-products"],
            &[
                ("metric", metric.as_str()),
                ("limit", limit.as_str()),
                ("days", days.as_str()),
            ],
        )?;
        self.request_json(Method::GET, url, "analytics top products")
            .await
    }
}
