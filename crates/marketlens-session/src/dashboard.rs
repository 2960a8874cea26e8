//! Composition root for one dashboard session.
//!
//! The search session and the sync orchestrator never see each other's
//! state; [`Dashboard::view`] joins them read-only for rendering.

use std::sync::Arc;

use marketlens_core::{AnalyticsOverview, ExternalProduct, SyncState, TrendPoint};
use marketlens_gateway::{CatalogGateway, GatewayError};
use serde::Serialize;

use crate::cache::AnalyticsCache;
use crate::search::{SearchSession, SessionState, SubmitOutcome};
use crate::sync::{SyncOrchestrator, SyncRecord, SyncRequest};

/// One search hit with the sync state of its identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub product: ExternalProduct,
    pub sync: SyncState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub session: SessionState,
    /// Renderable hits of the displayed result, in backend order.
    pub rows: Vec<ProductRow>,
    /// Every identifier ever synced this session, sorted.
    pub syncs: Vec<(String, SyncRecord)>,
}

pub struct Dashboard<G> {
    search: SearchSession<G>,
    syncs: SyncOrchestrator<G>,
    analytics: Arc<AnalyticsCache<G>>,
}

impl<G: CatalogGateway> Dashboard<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>, analytics: Arc<AnalyticsCache<G>>) -> Self {
        Self {
            search: SearchSession::new(Arc::clone(&gateway)),
            syncs: SyncOrchestrator::new(gateway),
            analytics,
        }
    }

    pub async fn submit_search(&self, query: &str) -> SubmitOutcome {
        self.search.submit(query).await
    }

    /// See [`SyncOrchestrator::request_sync`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn request_sync(&self, asin: &str) -> SyncRequest {
        self.syncs.request_sync(asin)
    }

    #[must_use]
    pub fn sync_state(&self, asin: &str) -> SyncState {
        self.syncs.get_state(asin)
    }

    /// # Errors
    ///
    /// Returns the gateway error when the overview is not cached and the
    /// fetch fails.
    pub async fn overview(&self) -> Result<AnalyticsOverview, GatewayError> {
        self.analytics.overview().await
    }

    /// # Errors
    ///
    /// Returns the gateway error when trends are not cached and the fetch
    /// fails.
    pub async fn trends(&self) -> Result<Vec<TrendPoint>, GatewayError> {
        self.analytics.trends().await
    }

    pub fn refresh_analytics(&self) {
        self.analytics.invalidate_all();
    }

    /// Resets the search session. Sync records are kept.
    pub fn clear_search(&self) {
        self.search.clear();
    }

    #[must_use]
    pub fn search(&self) -> &SearchSession<G> {
        &self.search
    }

    #[must_use]
    pub fn syncs(&self) -> &SyncOrchestrator<G> {
        &self.syncs
    }

    #[must_use]
    pub fn view(&self) -> DashboardView {
        let session = self.search.snapshot();
        let rows: Vec<ProductRow> = session
            .result
            .as_ref()
            .map(|result| {
                result
                    .renderable()
                    .map(|product| ProductRow {
                        product: product.clone(),
                        sync: self.syncs.get_state(&product.asin),
                    })
                    .collect()
            })
            .unwrap_or_default();

        DashboardView {
            session,
            rows,
            syncs: self.syncs.snapshot(),
        }
    }
}
