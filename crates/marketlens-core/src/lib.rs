pub mod analytics;
pub mod app_config;
pub mod config;
pub mod products;
pub mod state;

pub use analytics::{AnalyticsOverview, TopMetric, TopProduct, TrendPoint};
pub use app_config::AppConfig;
pub use config::load_app_config;
pub use products::{CatalogProduct, ExternalProduct, Price, PricePoint, SearchResult};
pub use state::{SearchPhase, SyncState};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
