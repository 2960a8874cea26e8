//! HTTP client for the catalog backend.

mod analytics;
mod products;

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Shared prefix of every backend route.
const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Client for the catalog backend.
///
/// Holds the `reqwest::Client` and the validated base URL. Non-2xx responses
/// surface as [`GatewayError::UnexpectedStatus`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Url,
}

impl GatewayClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::with_base_url`].
    pub fn from_config(config: &marketlens_core::AppConfig) -> Result<Self, GatewayError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client pointed at `base_url` (a mock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so path segments are appended
        // under any prefix the base URL carries.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| GatewayError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "expected an absolute http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Builds `{base}/api/v1/{segments...}?{params...}`.
    ///
    /// Segments are percent-encoded individually, so identifiers containing
    /// `/` or `?` stay inside their segment.
    pub(crate) fn endpoint(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Sends a body-less request and decodes a JSON response.
    ///
    /// `context` names the operation in deserialization errors.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        context: &str,
    ) -> Result<T, GatewayError> {
        tracing::debug!(%method, %url, "gateway request");

        let response = self.client.request(method, url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            tracing::debug!(status = status.as_u16(), %url, ?detail, "gateway non-success status");
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                detail,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| GatewayError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Pulls the human-readable `detail` out of a backend error body.
///
/// The backend reports errors as `{"detail": "..."}`; validation failures use
/// a list instead, which is not worth surfacing verbatim.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
