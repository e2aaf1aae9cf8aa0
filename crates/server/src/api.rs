//! HTTP binding for the alias resolver
//!
//! Routes:
//! - GET  /health
//! - GET  /api/search_file/:alias
//! - POST /api/search_files/batch
//! - GET  /api/search_tag?tag=..&tags=a,b&offset=0&limit=100
//!
//! Resolver calls run on the blocking pool since SQLite access is synchronous.

use crate::health;
use crate::resolver::{AliasResolver, ResolveError};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dataset_core::{
    parse_tag_params, ErrorBody, ErrorCode, ResolvedFile, TagQuery,
    TagSearchResult, DEFAULT_PAGE_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub resolver: AliasResolver,
}

impl AppState {
    pub fn new(resolver: AliasResolver) -> Self {
        Self { resolver }
    }
}

pub type SharedState = Arc<AppState>;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRequest {
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TagSearchParams {
    pub tag: Option<String>,
    /// Comma-separated tags, all of which must match
    pub tags: Option<String>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

// ============================================================================
// Error Mapping
// ============================================================================

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::BatchTooLarge | ErrorCode::NoTagsProvided | ErrorCode::InvalidRequest => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::InvalidPagination => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::DataDefect | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(code: ErrorCode, detail: String) -> Response {
    json_error(status_for(code), code, detail)
}

fn json_error(status: StatusCode, code: ErrorCode, detail: String) -> Response {
    if code.is_client_error() {
        tracing::debug!("Rejected request ({}): {}", code.as_str(), detail);
    } else {
        tracing::error!("Request failed ({}): {}", code.as_str(), detail);
    }
    let body = ErrorBody::new(status.canonical_reason().unwrap_or("Error"), detail, code);
    (status, Json(body)).into_response()
}

/// Undecodable query strings and bodies keep axum's status but get the JSON error body
fn rejection_response(status: StatusCode, detail: String) -> Response {
    json_error(status, ErrorCode::InvalidRequest, detail)
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        error_response(self.code(), self.to_string())
    }
}

// ============================================================================
// Router Builder
// ============================================================================

pub fn api_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/search_file/:alias", get(search_file))
        .route("/api/search_files/batch", post(search_files_batch))
        .route("/api/search_tag", get(search_tag))
        .fallback(route_not_found)
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Run a resolver operation on the blocking pool
async fn run_resolver<T, F>(state: SharedState, op: F) -> Result<T, ResolveError>
where
    T: Send + 'static,
    F: FnOnce(&AliasResolver) -> Result<T, ResolveError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&state.resolver))
        .await
        .map_err(|e| ResolveError::Worker(e.to_string()))?
}

async fn search_file(
    State(state): State<SharedState>,
    Path(alias): Path<String>,
) -> Result<Json<ResolvedFile>, ResolveError> {
    let file = run_resolver(state, move |r| r.resolve(&alias)).await?;
    Ok(Json(file))
}

async fn search_files_batch(
    State(state): State<SharedState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };
    match run_resolver(state, move |r| r.resolve_batch(&req.aliases)).await {
        Ok(batch) => Json(batch).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn search_tag(
    State(state): State<SharedState>,
    params: Result<Query<TagSearchParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };
    match tag_page(state, params).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn tag_page(
    state: SharedState,
    params: TagSearchParams,
) -> Result<TagSearchResult, ResolveError> {
    let tags = parse_tag_params(params.tag.as_deref(), params.tags.as_deref());
    // validated before any store access
    let query = TagQuery::new(tags, params.offset, params.limit)?;
    run_resolver(state, move |r| r.search(&query)).await
}

async fn route_not_found(uri: Uri) -> Response {
    error_response(ErrorCode::NotFound, format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class_follows_error_code() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::BatchTooLarge,
            ErrorCode::NoTagsProvided,
            ErrorCode::InvalidPagination,
            ErrorCode::InvalidRequest,
            ErrorCode::DataDefect,
            ErrorCode::Internal,
        ] {
            let status = status_for(code);
            assert_eq!(status.is_client_error(), code.is_client_error(), "{:?}", code);
            assert_eq!(status.is_server_error(), !code.is_client_error(), "{:?}", code);
        }
    }

    #[tokio::test]
    async fn test_rejection_keeps_status_with_json_code() {
        let response = rejection_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`".to_string(),
        );
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, ErrorCode::InvalidRequest);
        assert_eq!(body.error, "Unsupported Media Type");
    }
}
