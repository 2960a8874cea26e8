use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL, e.g. `"http://localhost:8000"`. Never ends with `/`.
    pub api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Interval after which cached analytics are refetched. `0` keeps them
    /// until invalidated by hand.
    pub analytics_ttl_secs: u64,
}

impl AppConfig {
    /// Analytics cache interval; `None` when expiry is disabled.
    #[must_use]
    pub fn analytics_ttl(&self) -> Option<Duration> {
        (self.analytics_ttl_secs > 0).then(|| Duration::from_secs(self.analytics_ttl_secs))
    }
}
