//! Typed client for the catalog backend's HTTP API.
//!
//! One method per backend operation. Every failure, whether network, status,
//! or body shape, comes back as a [`GatewayError`]; nothing here retries or
//! caches.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::GatewayClient;
pub use error::GatewayError;
pub use gateway::CatalogGateway;
