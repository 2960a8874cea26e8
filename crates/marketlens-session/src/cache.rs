//! Time-bounded caching for analytics reads.
//!
//! A [`TtlCache`] is populated by the first request, served until its
//! interval elapses or it is invalidated, then repopulated on the next
//! request. Loads hold the slot lock, so concurrent first requests share one
//! loader call. Failed loads are not stored.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use marketlens_core::{AnalyticsOverview, TrendPoint};
use marketlens_gateway::{CatalogGateway, GatewayError};
use tokio::sync::Mutex;
use tokio::time::Instant;

struct Cached<T> {
    value: T,
    loaded_at: Instant,
    generation: u64,
}

pub struct TtlCache<T> {
    /// `None` keeps entries until invalidated.
    ttl: Option<Duration>,
    slot: Mutex<Option<Cached<T>>>,
    generation: AtomicU64,
}

impl<T: Clone> TtlCache<T> {
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the cached value, or runs `load` and caches its success.
    ///
    /// # Errors
    ///
    /// Returns whatever `load` returns on failure; the cache stays empty.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        let generation = self.generation.load(Ordering::Acquire);

        if let Some(cached) = slot.as_ref() {
            if self.is_fresh(cached, generation) {
                return Ok(cached.value.clone());
            }
        }

        let value = load().await?;
        *slot = Some(Cached {
            value: value.clone(),
            loaded_at: Instant::now(),
            generation,
        });
        Ok(value)
    }

    /// Drops the cached value. A load already running finishes but its
    /// result is treated as stale by the next request.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// The cached value if it is still fresh, without loading.
    pub async fn peek(&self) -> Option<T> {
        let slot = self.slot.lock().await;
        let generation = self.generation.load(Ordering::Acquire);
        slot.as_ref()
            .filter(|cached| self.is_fresh(cached, generation))
            .map(|cached| cached.value.clone())
    }

    fn is_fresh(&self, cached: &Cached<T>, generation: u64) -> bool {
        cached.generation == generation
            && self
                .ttl
                .is_none_or(|ttl| cached.loaded_at.elapsed() < ttl)
    }
}

/// Overview and trends caches in front of a gateway.
pub struct AnalyticsCache<G> {
    gateway: Arc<G>,
    overview: TtlCache<AnalyticsOverview>,
    trends: TtlCache<Vec<TrendPoint>>,
}

impl<G: CatalogGateway> AnalyticsCache<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>, ttl: Option<Duration>) -> Self {
        Self {
            gateway,
            overview: TtlCache::new(ttl),
            trends: TtlCache::new(ttl),
        }
    }

    /// # Errors
    ///
    /// Returns the gateway error when the cache is cold and the fetch fails.
    pub async fn overview(&self) -> Result<AnalyticsOverview, GatewayError> {
        let gateway = &self.gateway;
        self.overview
            .get_or_load(|| async move {
                tracing::debug!("analytics overview cache miss");
                gateway.fetch_overview().await
            })
            .await
    }

    /// # Errors
    ///
    /// Returns the gateway error when the cache is cold and the fetch fails.
    pub async fn trends(&self) -> Result<Vec<TrendPoint>, GatewayError> {
        let gateway = &self.gateway;
        self.trends
            .get_or_load(|| async move {
                tracing::debug!("analytics trends cache miss");
                gateway.fetch_trends().await
            })
            .await
    }

    pub fn invalidate_all(&self) {
        self.overview.invalidate();
        self.trends.invalidate();
        tracing::info!("analytics cache invalidated");
    }
}
