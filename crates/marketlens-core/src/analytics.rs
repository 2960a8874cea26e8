//! Read-only analytics aggregates served by the backend.
//!
//! These are consumed as opaque values; nothing in this workspace computes
//! them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline numbers for the dashboard overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub total_products: u64,
    pub average_price: f64,
    pub total_revenue_30d: f64,
    pub average_rating: f64,
}

/// One day of aggregated catalog activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub conversions: u64,
}

/// A product ranked by one of the [`TopMetric`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub asin: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub metric_value: f64,
}

/// Ranking metric accepted by the top-products endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopMetric {
    #[default]
    Revenue,
    Views,
    Conversions,
}

impl TopMetric {
    /// Query-string value understood by the backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TopMetric::Revenue => "revenue",
            TopMetric::Views => "views",
            TopMetric::Conversions => "conversions",
        }
    }
}

impl std::fmt::Display for TopMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TopMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(TopMetric::Revenue),
            "views" => Ok(TopMetric::Views),
            "conversions" => Ok(TopMetric::Conversions),
            other => Err(format!(
                "unknown metric \"{other}\" (expected revenue, views, or conversions)"
            )),
        }
    }
}
