//! /health endpoint
//!
//! Reports liveness plus whether the alias database can be opened. Always
//! answers 200 so load balancers can tell "up but degraded" from "down".

use crate::api::SharedState;
use crate::db::AliasStore;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Alias database opened and answered a query
    pub database: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
    pub version: String,
    pub checked_at: DateTime<Utc>,
}

pub fn check_health(store: &AliasStore) -> HealthResponse {
    let (status, database, database_error) = match store.ping() {
        Ok(()) => (HealthStatus::Healthy, true, None),
        Err(e) => {
            tracing::warn!("Health check: alias database unavailable: {}", e);
            (HealthStatus::Degraded, false, Some(e.to_string()))
        }
    };

    HealthResponse {
        status,
        database,
        database_error,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checked_at: Utc::now(),
    }
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let store = state.resolver.store().clone();
    let response = match tokio::task::spawn_blocking(move || check_health(&store)).await {
        Ok(response) => response,
        Err(e) => HealthResponse {
            status: HealthStatus::Degraded,
            database: false,
            database_error: Some(e.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checked_at: Utc::now(),
        },
    };
    Json(response)
}
