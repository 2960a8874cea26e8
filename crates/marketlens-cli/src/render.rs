//! Plain-text rendering of dashboard state.
//!
//! Every function returns a `String` so output can be asserted on in tests;
//! callers decide where it is printed.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use marketlens_core::{
    AnalyticsOverview, CatalogProduct, Price, PricePoint, SearchPhase, SyncState, TopMetric,
    TopProduct, TrendPoint,
};
use marketlens_session::{DashboardView, SessionState, SyncNotice, SyncRecord};

const DASH: &str = "\u{2014}";
const TITLE_WIDTH: usize = 48;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width).collect::<String>())
    } else {
        text.to_owned()
    }
}

fn fmt_price(price: Option<Price>) -> String {
    price.map_or_else(|| DASH.to_owned(), |p| p.to_string())
}

fn fmt_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| DASH.to_owned(), |r| format!("{r:.1}"))
}

fn fmt_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Search status line plus the result table.
#[must_use]
pub fn render_view(view: &DashboardView) -> String {
    let mut out = render_session_status(&view.session);

    if view.rows.is_empty() {
        return out;
    }

    let _ = writeln!(
        out,
        "{:<12}{:<12}{:<8}{:<10}{:<16}TITLE",
        "ASIN", "PRICE", "RATING", "SYNC", "BRAND"
    );
    for row in &view.rows {
        let product = &row.product;
        let _ = writeln!(
            out,
            "{:<12}{:<12}{:<8}{:<10}{:<16}{}",
            product.asin,
            fmt_price(product.price()),
            fmt_rating(product.rating),
            row.sync.label(),
            truncate(product.brand().unwrap_or(DASH), 14),
            truncate(&product.title, TITLE_WIDTH)
        );
    }
    out
}

/// One-line summary of the search session, followed by its message if any.
#[must_use]
pub fn render_session_status(session: &SessionState) -> String {
    let mut out = match session.phase {
        SearchPhase::Idle => "No search yet. Use `search <query>`.\n".to_owned(),
        SearchPhase::Searching => format!("Searching for \"{}\"...\n", session.query),
        SearchPhase::Ready => {
            let total = session.result.as_ref().map_or(0, |r| r.total_results);
            format!("{total} result(s) for \"{}\"\n", session.query)
        }
        SearchPhase::Empty => format!("No results for \"{}\"\n", session.query),
        SearchPhase::Failed => format!("Search for \"{}\" failed\n", session.query),
    };
    if let Some(message) = &session.last_message {
        let _ = writeln!(out, "{message}");
    }
    if session.phase == SearchPhase::Failed {
        if let Some(previous) = &session.result {
            let _ = writeln!(out, "Showing previous results for \"{}\".", previous.query);
        }
    }
    out
}

#[must_use]
pub fn render_sync_records(records: &[(String, SyncRecord)]) -> String {
    if records.is_empty() {
        return "No syncs requested.\n".to_owned();
    }
    let mut out = format!("{:<12}{:<10}{:<10}MESSAGE\n", "ASIN", "STATE", "ATTEMPTS");
    for (asin, record) in records {
        let message = match (&record.state, &record.message) {
            (_, Some(message)) => message.clone(),
            (SyncState::InFlight, None) => "syncing...".to_owned(),
            _ => DASH.to_owned(),
        };
        let _ = writeln!(
            out,
            "{:<12}{:<10}{:<10}{}",
            asin,
            record.state.label(),
            record.attempts,
            message
        );
    }
    out
}

#[must_use]
pub fn render_notice(notice: &SyncNotice) -> String {
    match notice.outcome {
        SyncState::Succeeded => format!("[ok] {}", notice.message),
        _ => format!("[error] {}", notice.message),
    }
}

#[must_use]
pub fn render_overview(overview: &AnalyticsOverview) -> String {
    format!(
        "Total products:     {}\n\
         Average price:      {:.2}\n\
         Revenue (30 days):  {:.2}\n\
         Average rating:     {:.1}\n",
        overview.total_products,
        overview.average_price,
        overview.total_revenue_30d,
        overview.average_rating
    )
}

#[must_use]
pub fn render_trends(points: &[TrendPoint]) -> String {
    if points.is_empty() {
        return "No trend data.\n".to_owned();
    }
    let mut out = format!("{:<12}{:>12}{:>10}{:>13}\n", "DATE", "REVENUE", "VIEWS", "CONVERSIONS");
    for point in points {
        let _ = writeln!(
            out,
            "{:<12}{:>12.2}{:>10}{:>13}",
            point.date.format("%Y-%m-%d"),
            point.revenue,
            point.views,
            point.conversions
        );
    }
    out
}

#[must_use]
pub fn render_top_products(metric: TopMetric, products: &[TopProduct]) -> String {
    if products.is_empty() {
        return format!("No products ranked by {metric}.\n");
    }
    let mut out = format!(
        "{:<5}{:<12}{:>14}{:<3}TITLE\n",
        "#",
        "ASIN",
        metric.as_str().to_uppercase(),
        ""
    );
    for (rank, product) in products.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<5}{:<12}{:>14.2}{:<3}{}",
            rank + 1,
            product.asin,
            product.metric_value,
            "",
            truncate(&product.title, TITLE_WIDTH)
        );
    }
    out
}

#[must_use]
pub fn render_catalog(products: &[CatalogProduct]) -> String {
    if products.is_empty() {
        return "No products in the catalog. Sync some with `sync <asin>`.\n".to_owned();
    }
    let mut out = format!(
        "{:<12}{:<12}{:<8}{:<16}TITLE\n",
        "ASIN", "PRICE", "RATING", "CATEGORY"
    );
    for product in products {
        let _ = writeln!(
            out,
            "{:<12}{:<12}{:<8}{:<16}{}",
            product.asin,
            fmt_price(product.price()),
            fmt_rating(product.rating),
            truncate(product.category().unwrap_or(DASH), 14),
            truncate(&product.title, TITLE_WIDTH)
        );
    }
    out
}

#[must_use]
pub fn render_product(product: &CatalogProduct) -> String {
    let mut out = format!("{} {DASH} {}\n", product.asin, product.title);
    let _ = writeln!(out, "Price:        {}", fmt_price(product.price()));
    let _ = writeln!(
        out,
        "Rating:       {} ({} reviews)",
        fmt_rating(product.rating),
        product.review_count
    );
    let _ = writeln!(out, "Brand:        {}", product.brand().unwrap_or(DASH));
    let _ = writeln!(out, "Category:     {}", product.category().unwrap_or(DASH));
    let _ = writeln!(
        out,
        "Available:    {}",
        if product.availability { "yes" } else { "no" }
    );
    let _ = writeln!(out, "Synced at:    {}", fmt_timestamp(product.created_at));
    if let Some(updated) = product.updated_at {
        let _ = writeln!(out, "Updated at:   {}", fmt_timestamp(updated));
    }
    if let Some(url) = product.product_url() {
        let _ = writeln!(out, "URL:          {url}");
    }
    out
}

#[must_use]
pub fn render_price_history(asin: &str, points: &[PricePoint]) -> String {
    if points.is_empty() {
        return format!("No price history for {asin}.\n");
    }
    let mut out = format!("{:<22}PRICE\n", "RECORDED");
    for point in points {
        let _ = writeln!(
            out,
            "{:<22}{}",
            fmt_timestamp(point.timestamp),
            point.as_price()
        );
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
