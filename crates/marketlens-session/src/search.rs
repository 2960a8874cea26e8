//! Marketplace search session.
//!
//! Owns the current query, the last result set, and the in-flight flag. At
//! most one search runs at a time: a submission while `Searching` is dropped,
//! not queued. Failures never escape; they become the `Failed` phase with a
//! message, and the previously shown results stay in place.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use marketlens_core::{SearchPhase, SearchResult};
use marketlens_gateway::CatalogGateway;
use serde::Serialize;

/// Snapshot of the session for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    /// Last accepted (trimmed) query.
    pub query: String,
    /// Most recent successful result, kept across later failures.
    pub result: Option<SearchResult>,
    pub phase: SearchPhase,
    /// Advisory or failure message for the last search, if any.
    pub last_message: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn searching(&self) -> bool {
        self.phase == SearchPhase::Searching
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The search ran and the session settled in this phase.
    Completed(SearchPhase),
    /// Nothing was sent and the state was left untouched.
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    BlankQuery,
    AlreadySearching,
}

pub struct SearchSession<G> {
    gateway: Arc<G>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    /// Bumped by `clear` so a search started before the clear cannot write
    /// its result into the fresh session.
    generation: u64,
}

impl<G: CatalogGateway> SearchSession<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Submits `query` and waits for the search to settle.
    ///
    /// Blank queries and submissions made while another search is in flight
    /// return [`SubmitOutcome::Ignored`] without touching state or the
    /// network.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::BlankQuery);
        }

        let generation = {
            let mut inner = self.lock();
            if inner.state.searching() {
                tracing::debug!(query, "search already in flight; submission ignored");
                return SubmitOutcome::Ignored(IgnoreReason::AlreadySearching);
            }
            inner.state.phase = SearchPhase::Searching;
            inner.state.query = query.to_owned();
            inner.state.last_message = None;
            inner.generation
        };

        let mut guard = InFlightGuard {
            inner: &self.inner,
            generation,
            armed: true,
        };
        let response = self.gateway.search(query).await;
        guard.armed = false;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(query, "session cleared while searching; result discarded");
            return SubmitOutcome::Completed(inner.state.phase);
        }

        let state = &mut inner.state;
        match response {
            Ok(result) if result.is_empty_signal() => {
                tracing::info!(query, "search returned no results");
                state.phase = SearchPhase::Empty;
                state.last_message = Some(empty_advisory(query));
                state.result = Some(result);
            }
            Ok(result) => {
                tracing::info!(query, total_results = result.total_results, "search completed");
                state.phase = SearchPhase::Ready;
                state.last_message = None;
                state.result = Some(result);
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search failed");
                state.phase = SearchPhase::Failed;
                state.last_message = Some(failure_message(&e.message()));
            }
        }

        SubmitOutcome::Completed(state.phase)
    }

    /// Resets the session to `Idle` with no query or results.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation = inner.generation.wrapping_add(1);
        inner.state = SessionState::default();
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.lock().state.phase
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.inner)
    }
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // State is always written whole between awaits, so a poisoned lock still
    // holds a consistent value.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Moves the session out of `Searching` if the submitting future is dropped
/// before the gateway answers.
struct InFlightGuard<'a> {
    inner: &'a Mutex<Inner>,
    generation: u64,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = lock_inner(self.inner);
        if inner.generation == self.generation && inner.state.searching() {
            tracing::warn!(query = %inner.state.query, "search abandoned before completion");
            inner.state.phase = SearchPhase::Failed;
            inner.state.last_message = Some(failure_message("search was interrupted"));
        }
    }
}

/// Advisory for `total_results == 0`. The backend reports an unconfigured
/// marketplace source the same way as a genuine miss.
#[must_use]
pub fn empty_advisory(query: &str) -> String {
    format!(
        "No products found for \"{query}\". If results were expected, check that the \
         external data source is configured on the backend."
    )
}

#[must_use]
pub fn failure_message(reason: &str) -> String {
    format!(
        "Search failed: {reason}. Check that the backend and its external data source are \
         reachable and configured."
    )
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
