//! One-shot command handlers.
//!
//! Each handler makes its backend calls, prints the rendered result, and
//! turns failures into an `anyhow` error so the process exits non-zero.

use std::sync::Arc;

use marketlens_core::{SearchPhase, SyncState, TopMetric};
use marketlens_gateway::GatewayClient;
use marketlens_session::{Dashboard, SyncRequest};

use crate::render;

/// Run one search and print the session.
///
/// # Errors
///
/// Returns an error if the search ends in the `Failed` phase.
pub(crate) async fn run_search(
    dashboard: &Dashboard<GatewayClient>,
    query: &str,
) -> anyhow::Result<()> {
    dashboard.submit_search(query).await;
    let view = dashboard.view();
    print!("{}", render::render_view(&view));

    if view.session.phase == SearchPhase::Failed {
        anyhow::bail!("search for \"{}\" failed", view.session.query);
    }
    Ok(())
}

/// Sync every identifier concurrently and print the final states.
///
/// # Errors
///
/// Returns an error if any sync failed or an identifier was blank.
pub(crate) async fn run_sync(
    dashboard: &Dashboard<GatewayClient>,
    asins: &[String],
) -> anyhow::Result<()> {
    let mut rejected = 0usize;
    for asin in asins {
        match dashboard.request_sync(asin) {
            SyncRequest::Started => tracing::debug!(asin = %asin, "sync requested"),
            SyncRequest::AlreadyInFlight => {
                tracing::info!(asin = %asin, "duplicate identifier; already syncing");
            }
            SyncRequest::InvalidIdentifier => {
                eprintln!("skipping blank identifier");
                rejected += 1;
            }
        }
    }
    dashboard.syncs().settle().await;

    let records = dashboard.syncs().snapshot();
    print!("{}", render::render_sync_records(&records));

    let failed = records
        .iter()
        .filter(|(_, record)| matches!(record.state, SyncState::Failed(_)))
        .count();
    if failed + rejected > 0 {
        anyhow::bail!("{} of {} sync(s) failed", failed + rejected, asins.len());
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the backend request fails.
pub(crate) async fn run_overview(dashboard: &Dashboard<GatewayClient>) -> anyhow::Result<()> {
    let overview = dashboard.overview().await?;
    print!("{}", render::render_overview(&overview));
    Ok(())
}

/// Without `days` the backend's default window (and the analytics cache) is
/// used; with it the window is fetched directly.
///
/// # Errors
///
/// Returns an error if the backend request fails.
pub(crate) async fn run_trends(
    client: &GatewayClient,
    dashboard: &Dashboard<GatewayClient>,
    days: Option<u32>,
) -> anyhow::Result<()> {
    let points = match days {
        Some(days) => client.fetch_trends_window(days).await?,
        None => dashboard.trends().await?,
    };
    print!("{}", render::render_trends(&points));
    Ok(())
}

/// # Errors
///
/// Returns an error if the backend request fails.
pub(crate) async fn run_top_products(
    client: &GatewayClient,
    metric: TopMetric,
    limit: u32,
    days: u32,
) -> anyhow::Result<()> {
    let products = client.fetch_top_products(metric, limit, days).await?;
    print!("{}", render::render_top_products(metric, &products));
    Ok(())
}

/// # Errors
///
/// Returns an error if the backend request fails.
pub(crate) async fn run_products(
    client: &GatewayClient,
    category: Option<&str>,
    skip: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let products = client.list_products(category, skip, limit).await?;
    print!("{}", render::render_catalog(&products));
    Ok(())
}

/// # Errors
///
/// Returns an error if the product is not in the catalog or the request
/// fails.
pub(crate) async fn run_product(client: &GatewayClient, asin: &str) -> anyhow::Result<()> {
    let product = match client.fetch_product(asin).await {
        Ok(product) => product,
        Err(e) if e.status() == Some(404) => {
            anyhow::bail!("product '{asin}' is not in the catalog; run `sync {asin}` first")
        }
        Err(e) => return Err(e.into()),
    };
    print!("{}", render::render_product(&product));
    Ok(())
}

/// # Errors
///
/// Returns an error if the backend request fails.
pub(crate) async fn run_price_history(client: &GatewayClient, asin: &str) -> anyhow::Result<()> {
    let points = client.fetch_price_history(asin).await?;
    print!("{}", render::render_price_history(asin, &points));
    Ok(())
}

/// Shares one client between the one-shot handlers and the dashboard.
pub(crate) fn build_dashboard(
    client: &Arc<GatewayClient>,
    config: &marketlens_core::AppConfig,
) -> Dashboard<GatewayClient> {
    let analytics = Arc::new(marketlens_session::AnalyticsCache::new(
        Arc::clone(client),
        config.analytics_ttl(),
    ));
    Dashboard::new(Arc::clone(client), analytics)
}
