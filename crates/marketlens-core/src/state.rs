//! State enums shared between the session layer and its renderers.

use serde::Serialize;

/// Per-identifier synchronization state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SyncState {
    /// No sync has been requested for this identifier.
    #[default]
    Idle,
    InFlight,
    Succeeded,
    /// Carries the transport error message of the failed attempt.
    Failed(String),
}

impl SyncState {
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SyncState::InFlight)
    }

    /// Short label for list rendering.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SyncState::Idle => "idle",
            SyncState::InFlight => "syncing",
            SyncState::Succeeded => "synced",
            SyncState::Failed(_) => "failed",
        }
    }
}

/// Lifecycle of the search session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    /// Last search returned at least one result.
    Ready,
    /// Last search returned `total_results == 0`.
    Empty,
    /// Last search failed at the transport boundary.
    Failed,
}
