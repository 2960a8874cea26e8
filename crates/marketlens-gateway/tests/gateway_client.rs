//! Integration tests for `GatewayClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers each backend route's happy path and the
//! error variants every route can surface.

use marketlens_core::TopMetric;
use marketlens_gateway::{GatewayClient, GatewayError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a `GatewayClient` suitable for tests: 5-second timeout, descriptive UA.
fn test_client(base_url: &str) -> GatewayClient {
    GatewayClient::with_base_url(base_url, 5, "marketlens-test/0.1")
        .expect("failed to build test GatewayClient")
}

fn search_hit(asin: &str) -> serde_json::Value {
    json!({
        "asin": asin,
        "title": format!("Product {asin}"),
        "price": 24.99,
        "currency": "USD",
        "rating": 4.4,
        "review_count": 812,
        "category": "Electronics",
        "brand": "Acme",
        "availability": true,
        "image_url": "",
        "product_url": format!("https://www.amazon.com/dp/{asin}"),
        "description": format!("Product {asin}"),
        "features": null,
        "dimensions": null,
        "weight": null
    })
}

fn catalog_record(asin: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "asin": asin,
        "title": format!("Product {asin}"),
        "price": 24.99,
        "currency": "USD",
        "rating": 4.4,
        "review_count": 812,
        "category": "Electronics",
        "brand": "Acme",
        "availability": true,
        "image_url": null,
        "product_url": null,
        "description": "",
        "features": ["wireless"],
        "dimensions": {},
        "weight": 0.1,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": null
    })
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_returns_parsed_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/search/amazon"))
        .and(query_param("query", "wireless mouse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "wireless mouse",
            "total_results": 2,
            "products": [search_hit("A1"), search_hit("A2")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .search("wireless mouse")
        .await
        .expect("search should succeed");

    assert_eq!(result.query, "wireless mouse");
    assert_eq!(result.total_results, 2);
    assert_eq!(result.products.len(), 2);
    assert_eq!(result.products[0].asin, "A1");
    assert_eq!(result.products[0].image_url.as_deref(), Some(""));
    assert_eq!(result.products[0].brand(), Some("Acme"));
}

#[tokio::test]
async fn search_passes_zero_results_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/search/amazon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "zzz-no-match",
            "total_results": 0,
            "products": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search("zzz-no-match").await.unwrap();

    assert!(result.is_empty_signal());
    assert!(result.products.is_empty());
}

#[tokio::test]
async fn search_maps_5xx_to_unexpected_status_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/search/amazon"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("mouse").await.unwrap_err();

    match err {
        GatewayError::UnexpectedStatus { status, detail, .. } => {
            assert_eq!(status, 503);
            assert!(detail.is_none());
        }
        other => panic!("expected GatewayError::UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn search_propagates_malformed_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/search/amazon"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search("mouse").await;

    assert!(
        matches!(result, Err(GatewayError::Deserialize { .. })),
        "expected GatewayError::Deserialize, got: {result:?}"
    );
}

#[tokio::test]
async fn search_reports_network_failure_as_http_error() {
    // Nothing listens on port 1.
    let client = test_client("http://127.0.0.1:1");
    let result = client.search("mouse").await;

    assert!(
        matches!(result, Err(GatewayError::Http(_))),
        "expected GatewayError::Http, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_item_posts_and_returns_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/products/sync/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_record("A1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let record = client.sync_item("A1").await.expect("sync should succeed");

    assert_eq!(record.asin, "A1");
    assert_eq!(record.id, 1);
}

#[tokio::test]
async fn sync_item_surfaces_backend_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/products/sync/B9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Product not found on Amazon"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.sync_item("B9").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(
        err.message().ends_with("Product not found on Amazon"),
        "message should carry the backend detail: {}",
        err.message()
    );
}

// ---------------------------------------------------------------------------
// analytics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_overview_parses_numbers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_products": 42,
            "average_price": 31.5,
            "total_revenue_30d": 10450.25,
            "average_rating": 4.2
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let overview = client.fetch_overview().await.unwrap();

    assert_eq!(overview.total_products, 42);
    assert!((overview.total_revenue_30d - 10450.25).abs() < f64::EPSILON);
}

#[tokio::test]
async fn fetch_trends_window_sends_days_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/trends"))
        .and(query_param("days", "14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2024-05-01", "revenue": 100.0, "views": 40, "conversions": 2},
            {"date": "2024-05-02", "revenue": 0, "views": 0, "conversions": 0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let trends = client.fetch_trends_window(14).await.unwrap();

    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0].views, 40);
    assert_eq!(trends[1].date.to_string(), "2024-05-02");
}

#[tokio::test]
async fn fetch_trends_maps_422_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/trends"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["query", "days"], "msg": "too small"}]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_trends_window(1).await.unwrap_err();

    match err {
        GatewayError::UnexpectedStatus { status, detail, .. } => {
            assert_eq!(status, 422);
            assert!(detail.is_none(), "list-shaped detail is not surfaced");
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_top_products_sends_metric_limit_and_days() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/top-products"))
        .and(query_param("metric", "views"))
        .and(query_param("limit", "5"))
        .and(query_param("days", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"asin": "A1", "title": "Mouse", "price": 19.99, "rating": 4.5, "metric_value": 900}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let top = client
        .fetch_top_products(TopMetric::Views, 5, 30)
        .await
        .unwrap();

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].asin, "A1");
}

// ---------------------------------------------------------------------------
// catalog reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_products_hits_collection_route_with_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "20"))
        .and(query_param("category", "Electronics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([catalog_record("A1")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client
        .list_products(Some("Electronics"), 0, 20)
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn fetch_product_not_found_is_status_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/ZZZ"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Product not found"})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_product("ZZZ").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn fetch_price_history_parses_points() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/A1/price-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "asin": "A1", "price": 18.5, "currency": "USD", "timestamp": "2024-05-02T00:00:00Z"},
            {"id": 1, "asin": "A1", "price": 19.99, "currency": "USD", "timestamp": "2024-05-01T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let history = client.fetch_price_history("A1").await.unwrap();

    assert_eq!(history.len(), 2);
    assert!(history[0].timestamp > history[1].timestamp);
}
