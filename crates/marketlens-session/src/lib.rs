//! Search, sync, and analytics state for the catalog dashboard.
//!
//! Everything here is generic over [`CatalogGateway`] and catches gateway
//! errors at its own boundary: callers see phases, states, and messages,
//! never a raw [`marketlens_gateway::GatewayError`] from a search or sync.
//!
//! [`CatalogGateway`]: marketlens_gateway::CatalogGateway

pub mod cache;
pub mod dashboard;
pub mod search;
pub mod sync;

#[cfg(test)]
mod testing;

pub use cache::{AnalyticsCache, TtlCache};
pub use dashboard::{Dashboard, DashboardView, ProductRow};
pub use search::{IgnoreReason, SearchSession, SessionState, SubmitOutcome};
pub use sync::{SyncNotice, SyncOrchestrator, SyncRecord, SyncRequest};
