//! Dataset Server Library
//!
//! Alias and tag resolution over the read-only alias database, plus the
//! HTTP router that exposes it. The binary in `main.rs` only wires config,
//! logging and the listener around `api_router`.

pub mod api;
pub mod db;
pub mod health;
pub mod inventory;
pub mod resolver;

pub use api::{api_router, AppState, BatchRequest, SharedState, TagSearchParams};
pub use db::{AliasStore, StoreSession, TagFilter, ALIAS_TABLE};
pub use health::{check_health, HealthResponse, HealthStatus};
pub use resolver::{AliasResolver, ResolveError};

use std::sync::Arc;

/// Build the full router from a loaded configuration
pub fn build_router(config: &dataset_core::ServiceConfig) -> axum::Router {
    let resolver = AliasResolver::from_config(config);
    api_router(Arc::new(AppState::new(resolver)))
}
