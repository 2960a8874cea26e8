//! Scripted in-memory gateway for session tests.
//!
//! Each call pops the next scripted response for its operation. A response
//! can be ready immediately or held behind a `oneshot` until the test
//! releases it, which is how tests observe `Searching` / `InFlight`.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use marketlens_core::{
    AnalyticsOverview, CatalogProduct, ExternalProduct, SearchResult, TrendPoint,
};
use marketlens_gateway::{CatalogGateway, GatewayError};
use tokio::sync::oneshot;

pub(crate) type Reply<T> = Result<T, GatewayError>;

enum Scripted<T> {
    Ready(Reply<T>),
    Gated(oneshot::Receiver<Reply<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Reply<T> {
        match self {
            Scripted::Ready(reply) => reply,
            Scripted::Gated(rx) => rx.await.unwrap_or_else(|_| Err(status_error(499))),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeGateway {
    searches: Mutex<VecDeque<Scripted<SearchResult>>>,
    syncs: Mutex<HashMap<String, VecDeque<Scripted<CatalogProduct>>>>,
    overviews: Mutex<VecDeque<Reply<AnalyticsOverview>>>,
    trends: Mutex<VecDeque<Reply<Vec<TrendPoint>>>>,
    search_calls: AtomicUsize,
    sync_calls: Mutex<HashMap<String, usize>>,
    overview_calls: AtomicUsize,
    trends_calls: AtomicUsize,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_search(&self, reply: Reply<SearchResult>) {
        self.searches
            .lock()
            .unwrap()
            .push_back(Scripted::Ready(reply));
    }

    /// Scripts a search that stays pending until the returned sender fires.
    pub(crate) fn push_gated_search(&self) -> oneshot::Sender<Reply<SearchResult>> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn push_sync(&self, asin: &str, reply: Reply<CatalogProduct>) {
        self.syncs
            .lock()
            .unwrap()
            .entry(asin.to_owned())
            .or_default()
            .push_back(Scripted::Ready(reply));
    }

    pub(crate) fn push_gated_sync(&self, asin: &str) -> oneshot::Sender<Reply<CatalogProduct>> {
        let (tx, rx) = oneshot::channel();
        self.syncs
            .lock()
            .unwrap()
            .entry(asin.to_owned())
            .or_default()
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn push_overview(&self, reply: Reply<AnalyticsOverview>) {
        self.overviews.lock().unwrap().push_back(reply);
    }

    pub(crate) fn push_trends(&self, reply: Reply<Vec<TrendPoint>>) {
        self.trends.lock().unwrap().push_back(reply);
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn sync_calls(&self, asin: &str) -> usize {
        self.sync_calls
            .lock()
            .unwrap()
            .get(asin)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn overview_calls(&self) -> usize {
        self.overview_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn trends_calls(&self) -> usize {
        self.trends_calls.load(Ordering::SeqCst)
    }
}

impl CatalogGateway for FakeGateway {
    fn search(&self, _query: &str) -> impl Future<Output = Reply<SearchResult>> + Send {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.searches.lock().unwrap().pop_front();
        async move {
            match next {
                Some(scripted) => scripted.resolve().await,
                None => Err(status_error(599)),
            }
        }
    }

    fn sync_item(&self, asin: &str) -> impl Future<Output = Reply<CatalogProduct>> + Send {
        *self
            .sync_calls
            .lock()
            .unwrap()
            .entry(asin.to_owned())
            .or_default() += 1;
        let next = self
            .syncs
            .lock()
            .unwrap()
            .get_mut(asin)
            .and_then(VecDeque::pop_front);
        async move {
            match next {
                Some(scripted) => scripted.resolve().await,
                None => Err(status_error(599)),
            }
        }
    }

    fn fetch_overview(&self) -> impl Future<Output = Reply<AnalyticsOverview>> + Send {
        self.overview_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.overviews.lock().unwrap().pop_front();
        async move { next.unwrap_or_else(|| Err(status_error(599))) }
    }

    fn fetch_trends(&self) -> impl Future<Output = Reply<Vec<TrendPoint>>> + Send {
        self.trends_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.trends.lock().unwrap().pop_front();
        async move { next.unwrap_or_else(|| Err(status_error(599))) }
    }
}

pub(crate) fn status_error(status: u16) -> GatewayError {
    GatewayError::UnexpectedStatus {
        status,
        url: "http://fake.test/api/v1".to_owned(),
        detail: None,
    }
}

pub(crate) fn external(asin: &str) -> ExternalProduct {
    ExternalProduct {
        asin: asin.to_owned(),
        title: format!("Product {asin}"),
        price: Some(19.99),
        currency: "USD".to_owned(),
        rating: Some(4.5),
        review_count: 100,
        category: Some("Electronics".to_owned()),
        brand: Some("Acme".to_owned()),
        availability: true,
        image_url: None,
        product_url: None,
        description: None,
    }
}

pub(crate) fn search_result(query: &str, asins: &[&str]) -> SearchResult {
    SearchResult {
        query: query.to_owned(),
        total_results: asins.len() as u64,
        products: asins.iter().map(|a| external(a)).collect(),
    }
}

pub(crate) fn catalog(asin: &str) -> CatalogProduct {
    CatalogProduct {
        id: 1,
        asin: asin.to_owned(),
        title: format!("Product {asin}"),
        price: Some(19.99),
        currency: "USD".to_owned(),
        rating: Some(4.5),
        review_count: 100,
        category: None,
        brand: None,
        availability: true,
        image_url: None,
        product_url: None,
        description: None,
        features: None,
        dimensions: None,
        weight: None,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

pub(crate) fn overview(total_products: u64) -> AnalyticsOverview {
    AnalyticsOverview {
        total_products,
        average_price: 20.0,
        total_revenue_30d: 1000.0,
        average_rating: 4.0,
    }
}
