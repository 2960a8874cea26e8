//! Product records exchanged with the catalog backend.
//!
//! ## Observed shape from the backend
//!
//! ### Marketplace search hits
//! Search results are converted server-side from the marketplace provider.
//! Missing text fields come back as empty strings (`""`), not `null`, so the
//! accessors below treat blank strings as absent. `price` is `0.0` when the
//! provider had no price; we keep it as-is and leave interpretation to the
//! presentation layer.
//!
//! ### Catalog records
//! The sync and product endpoints return the stored row: the same fields as a
//! search hit plus the numeric row `id`, free-form `features` / `dimensions`
//! JSON, and timestamps. `updated_at` is `null` until the row is modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product as found on the external marketplace. Immutable once fetched;
/// the next search replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProduct {
    /// Marketplace identifier (ASIN), e.g. `"B08N5WRWNW"`.
    pub asin: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    /// ISO 4217 currency code. Defaults to `"USD"` when absent.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Average star rating on a 0.0–5.0 scale.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    /// Defaults to `true` when absent (optimistic, matching the backend).
    #[serde(default = "default_available")]
    pub availability: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExternalProduct {
    /// Returns `true` when the identifier is usable as a sync key.
    #[must_use]
    pub fn has_identifier(&self) -> bool {
        !self.asin.trim().is_empty()
    }

    /// Price with its currency, if the marketplace reported one.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price.map(|amount| Price {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Brand, with the backend's `""` read as absent.
    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        non_blank(self.brand.as_deref())
    }
}

/// Monetary amount paired with its currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

/// Response of a marketplace search.
///
/// `total_results == 0` covers both "nothing matched" and "the external data
/// source is not configured on the backend"; the two cannot be told apart
/// from this payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub total_results: u64,
    #[serde(default)]
    pub products: Vec<ExternalProduct>,
}

impl SearchResult {
    /// Returns `true` for the ambiguous zero-results signal.
    #[must_use]
    pub fn is_empty_signal(&self) -> bool {
        self.total_results == 0
    }

    /// Products that can be shown and synced (non-blank identifier), in
    /// backend order.
    pub fn renderable(&self) -> impl Iterator<Item = &ExternalProduct> {
        self.products.iter().filter(|p| p.has_identifier())
    }
}

/// A product row in the internal catalog, as returned after a sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub asin: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default = "default_available")]
    pub availability: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Option<serde_json::Value>,
    #[serde(default)]
    pub dimensions: Option<serde_json::Value>,
    #[serde(default)]
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogProduct {
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price.map(|amount| Price {
            amount,
            currency: self.currency.clone(),
        })
    }

    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        non_blank(self.brand.as_deref())
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    #[must_use]
    pub fn product_url(&self) -> Option<&str> {
        non_blank(self.product_url.as_deref())
    }
}

/// One entry of a product's recorded price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub id: i64,
    pub asin: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}

impl PricePoint {
    #[must_use]
    pub fn as_price(&self) -> Price {
        Price {
            amount: self.price,
            currency: self.currency.clone(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_owned()
}

fn default_available() -> bool {
    true
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(asin: &str) -> ExternalProduct {
        ExternalProduct {
            asin: asin.to_owned(),
            title: "Wireless Mouse".to_owned(),
            price: Some(19.99),
            currency: "USD".to_owned(),
            rating: Some(4.5),
            review_count: 1200,
            category: Some(String::new()),
            brand: Some("Logi".to_owned()),
            availability: true,
            image_url: None,
            product_url: Some("  ".to_owned()),
            description: None,
        }
    }

    #[test]
    fn deserializes_minimal_search_hit_with_defaults() {
        let p: ExternalProduct = serde_json::from_str(r#"{"asin":"A1"}"#).unwrap();
        assert_eq!(p.asin, "A1");
        assert_eq!(p.currency, "USD");
        assert!(p.availability);
        assert_eq!(p.review_count, 0);
        assert!(p.price.is_none());
    }

    #[test]
    fn blank_brand_is_treated_as_absent() {
        let mut p = product("A1");
        assert_eq!(p.brand(), Some("Logi"));
        p.brand = Some("   ".to_owned());
        assert_eq!(p.brand(), None);
    }

    #[test]
    fn price_formats_with_currency() {
        let price = product("A1").price().unwrap();
        assert_eq!(price.to_string(), "USD 19.99");
    }

    #[test]
    fn renderable_skips_blank_identifiers() {
        let result = SearchResult {
            query: "mouse".to_owned(),
            total_results: 3,
            products: vec![product("A1"), product(" "), product("A2")],
        };
        let ids: Vec<&str> = result.renderable().map(|p| p.asin.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2"]);
    }

    #[test]
    fn zero_total_is_the_empty_signal() {
        let result: SearchResult =
            serde_json::from_str(r#"{"query":"zzz","total_results":0,"products":[]}"#).unwrap();
        assert!(result.is_empty_signal());
    }

    #[test]
    fn catalog_product_parses_backend_record() {
        let json = serde_json::json!({
            "id": 7,
            "asin": "A1",
            "title": "Wireless Mouse",
            "price": 19.99,
            "currency": "USD",
            "rating": 4.5,
            "review_count": 10,
            "category": "Electronics",
            "brand": "Logi",
            "availability": true,
            "image_url": null,
            "product_url": null,
            "description": "",
            "features": ["2.4GHz", "USB"],
            "dimensions": {"w": 6},
            "weight": 0.2,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": null
        });
        let record: CatalogProduct = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, 7);
        assert!(record.features.is_some());
        assert!(record.updated_at.is_none());
        assert_eq!(record.price().unwrap().to_string(), "USD 19.99");
        assert_eq!(record.category(), Some("Electronics"));
        assert_eq!(record.product_url(), None);
    }

    #[test]
    fn catalog_product_reads_blank_text_as_absent() {
        let json = serde_json::json!({
            "id": 8,
            "asin": "B9",
            "title": "Mouse Pad",
            "category": "",
            "brand": " ",
            "product_url": "",
            "created_at": "2024-05-01T10:00:00Z"
        });
        let record: CatalogProduct = serde_json::from_value(json).unwrap();
        assert_eq!(record.brand(), None);
        assert_eq!(record.category(), None);
        assert_eq!(record.product_url(), None);
    }

    #[test]
    fn price_point_converts_to_price() {
        let point: PricePoint = serde_json::from_value(serde_json::json!({
            "id": 1,
            "asin": "A1",
            "price": 18.5,
            "timestamp": "2024-05-02T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(point.as_price().to_string(), "USD 18.50");
    }
}
