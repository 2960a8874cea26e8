//! Per-product sync orchestration.
//!
//! Each identifier has its own [`SyncState`]. A request for an identifier
//! that is already `InFlight` is dropped; requests for different identifiers
//! never wait on each other. The gateway call runs on a spawned task, so
//! [`SyncOrchestrator::request_sync`] returns as soon as `InFlight` is
//! recorded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use marketlens_core::{CatalogProduct, SyncState};
use marketlens_gateway::CatalogGateway;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const NOTICE_CAPACITY: usize = 64;

/// Everything known about one identifier's sync history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncRecord {
    pub state: SyncState,
    /// Confirmation or failure message from the last finished attempt.
    pub message: Option<String>,
    /// Number of attempts started, including the current one.
    pub attempts: u32,
    /// Catalog record returned by the last successful sync.
    pub product: Option<CatalogProduct>,
}

/// Published once per finished sync attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncNotice {
    pub asin: String,
    pub outcome: SyncState,
    pub message: String,
}

/// Result of [`SyncOrchestrator::request_sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRequest {
    /// State moved to `InFlight` and the gateway call was spawned.
    Started,
    /// A sync for this identifier is already running; nothing was sent.
    AlreadyInFlight,
    /// The identifier was blank.
    InvalidIdentifier,
}

type Records = Arc<Mutex<HashMap<String, SyncRecord>>>;

pub struct SyncOrchestrator<G> {
    gateway: Arc<G>,
    records: Records,
    notices: broadcast::Sender<SyncNotice>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl<G> Clone for SyncOrchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            records: Arc::clone(&self.records),
            notices: self.notices.clone(),
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl<G: CatalogGateway> SyncOrchestrator<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            gateway,
            records: Arc::default(),
            notices,
            tasks: Arc::default(),
        }
    }

    /// Starts a sync for `asin` unless one is already in flight.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn request_sync(&self, asin: &str) -> SyncRequest {
        let asin = asin.trim();
        if asin.is_empty() {
            return SyncRequest::InvalidIdentifier;
        }

        {
            let mut records = lock(&self.records);
            let record = records.entry(asin.to_owned()).or_default();
            if record.state.is_in_flight() {
                tracing::debug!(asin, "sync already in flight; request ignored");
                return SyncRequest::AlreadyInFlight;
            }
            record.state = SyncState::InFlight;
            record.message = None;
            record.attempts = record.attempts.saturating_add(1);
            tracing::info!(asin, attempt = record.attempts, "sync started");
        }

        // Moved into the task future, so it drops even if never polled.
        let guard = InterruptGuard {
            records: Arc::clone(&self.records),
            asin: asin.to_owned(),
            armed: true,
        };
        let handle = tokio::spawn(run_sync(
            Arc::clone(&self.gateway),
            self.notices.clone(),
            guard,
        ));

        let mut tasks = lock(&self.tasks);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);

        SyncRequest::Started
    }

    /// Current state for `asin`; `Idle` if it was never requested.
    #[must_use]
    pub fn get_state(&self, asin: &str) -> SyncState {
        lock(&self.records)
            .get(asin.trim())
            .map(|record| record.state.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn record(&self, asin: &str) -> Option<SyncRecord> {
        lock(&self.records).get(asin.trim()).cloned()
    }

    /// All known identifiers with their records, sorted by identifier.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, SyncRecord)> {
        let mut entries: Vec<_> = lock(&self.records)
            .iter()
            .map(|(asin, record)| (asin.clone(), record.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        lock(&self.records)
            .values()
            .filter(|record| record.state.is_in_flight())
            .count()
    }

    /// Receiver for notices published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SyncNotice> {
        self.notices.subscribe()
    }

    /// Waits for every sync spawned so far, including ones requested while
    /// waiting.
    pub async fn settle(&self) {
        loop {
            let pending = std::mem::take(&mut *lock(&self.tasks));
            if pending.is_empty() {
                return;
            }
            for joined in futures::future::join_all(pending).await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "sync task did not complete");
                }
            }
        }
    }
}

async fn run_sync<G: CatalogGateway>(
    gateway: Arc<G>,
    notices: broadcast::Sender<SyncNotice>,
    mut guard: InterruptGuard,
) {
    let response = gateway.sync_item(&guard.asin).await;
    guard.armed = false;
    let asin = guard.asin.as_str();

    let notice = {
        let mut records = lock(&guard.records);
        let record = records.entry(asin.to_owned()).or_default();
        match response {
            Ok(product) => {
                tracing::info!(asin, id = product.id, "sync succeeded");
                record.state = SyncState::Succeeded;
                record.product = Some(product);
                record.message = Some(success_message(asin));
            }
            Err(e) => {
                let reason = e.message();
                tracing::warn!(asin, error = %reason, "sync failed");
                record.message = Some(failure_message(asin, &reason));
                record.state = SyncState::Failed(reason);
            }
        }
        SyncNotice {
            asin: asin.to_owned(),
            outcome: record.state.clone(),
            message: record.message.clone().unwrap_or_default(),
        }
    };

    // No subscribers is fine; the record already holds the message.
    let _ = notices.send(notice);
}

/// Marks the identifier `Failed` if its sync task ends without an answer:
/// aborted (even before its first poll), panicked, or dropped at runtime
/// shutdown.
struct InterruptGuard {
    records: Records,
    asin: String,
    armed: bool,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut records = lock(&self.records);
        if let Some(record) = records.get_mut(&self.asin) {
            if record.state.is_in_flight() {
                tracing::warn!(asin = %self.asin, "sync task ended without a response");
                let reason = "sync was interrupted".to_owned();
                record.message = Some(failure_message(&self.asin, &reason));
                record.state = SyncState::Failed(reason);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[must_use]
pub fn success_message(asin: &str) -> String {
    format!("Product {asin} synced successfully")
}

#[must_use]
pub fn failure_message(asin: &str, reason: &str) -> String {
    format!("Failed to sync product {asin}: {reason}")
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
