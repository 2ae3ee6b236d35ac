// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::config::Config;
use crate::error::{ApiError, EngineError, ErrorResponse};
use crate::models::backend::Backend;
use crate::models::document::{DocumentSubmission, DocumentView};
use crate::models::search::{SearchParams, SearchResponse};
use crate::models::version::VersionResponse;
use crate::services::bootstrap::connect_with_retry;
use crate::services::engine::SearchEngine;
use crate::services::ingest::ingest_documents;
use crate::services::memory::InMemoryEngine;
use crate::services::opensearch::OpenSearchEngine;
use crate::services::query::{search_documents, validate_params, ProjectionPolicy};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, RawQuery, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SEARCH_API_PATCH_VERSION`
/// (see [`crate::version::compose_version`]).
pub const VERSION: &str = env!("SEARCH_API_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Long-lived engine handle, shared by all in-flight requests.
    pub engine: Arc<dyn SearchEngine>,
    pub backend: Backend,
    pub projection_policy: ProjectionPolicy,
}

impl AppState {
    pub fn new(engine: Arc<dyn SearchEngine>, backend: Backend) -> Self {
        Self {
            engine,
            backend,
            projection_policy: ProjectionPolicy::default(),
        }
    }
}

/// Create the configured engine, blocking until it is reachable.
///
/// The in-memory backend is always ready. The OpenSearch backend is retried
/// according to the configured policy.
pub async fn connect_engine(config: &Config) -> Result<Arc<dyn SearchEngine>, EngineError> {
    match config.backend {
        Backend::Memory => {
            info!("Using in-memory search engine");
            Ok(Arc::new(InMemoryEngine::new()))
        }
        Backend::OpenSearch => {
            let engine = connect_with_retry(&config.retry_policy(), || async move {
                let engine =
                    OpenSearchEngine::new(&config.opensearch_url, config.index_name.as_str())?;
                engine.ping().await?;
                Ok::<_, EngineError>(engine)
            })
            .await?;
            Ok(Arc::new(engine))
        }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Service version", body = VersionResponse))
)]
pub async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "search-api".to_string(),
        version: VERSION.to_string(),
        backend: state.backend.to_string(),
    })
}

/// Index a batch of documents.
///
/// The body is read as JSON whatever the declared content type. A `null` body
/// is treated as an empty batch. Batch size is not capped.
#[utoipa::path(
    post,
    path = "/documents",
    request_body = Vec<DocumentSubmission>,
    responses(
        (status = 200, description = "Documents submitted to the index"),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Failed to create documents", body = ErrorResponse)
    )
)]
pub async fn create_documents_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let body = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let submissions: Option<Vec<DocumentSubmission>> =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    ingest_documents(state.engine.as_ref(), submissions.unwrap_or_default()).await?;

    Ok(StatusCode::OK)
}

/// Fuzzy search over document titles and contents.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Ranked page of matching documents", body = SearchResponse),
        (status = 400, description = "Query not specified", body = ErrorResponse),
        (status = 500, description = "Something went wrong", body = ErrorResponse)
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = validate_params(SearchParams::from_query_string(raw_query.as_deref()))?;

    search_documents(state.engine.as_ref(), &request, state.projection_policy)
        .await
        .map(Json)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(version_handler, create_documents_handler, search_handler),
    components(schemas(
        DocumentSubmission,
        DocumentView,
        SearchResponse,
        VersionResponse,
        ErrorResponse
    ))
)]
pub struct ApiDoc;

/// Build the Axum application router, with Swagger UI at `/swagger-ui`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route(
            "/documents",
            post(create_documents_handler).layer(DefaultBodyLimit::disable()),
        )
        .route("/search", get(search_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_both_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/documents"));
        assert!(doc.paths.paths.contains_key("/search"));
        assert!(doc.paths.paths.contains_key("/version"));
    }

    #[test]
    fn test_version_follows_semver_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }

    #[test]
    fn test_version_embeds_patch_override() {
        let expected = crate::version::compose_version(
            env!("CARGO_PKG_VERSION"),
            option_env!("SEARCH_API_PATCH_VERSION"),
        )
        .unwrap();
        assert_eq!(VERSION, expected);
    }

    #[tokio::test]
    async fn test_connect_engine_memory_backend() {
        let config = <Config as clap::Parser>::try_parse_from([
            "search-api",
            "--backend",
            "memory",
        ])
        .unwrap();

        assert!(connect_engine(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_connect_engine_gives_up_on_unreachable_cluster() {
        let config = <Config as clap::Parser>::try_parse_from([
            "search-api",
            "--opensearch-url",
            "http://127.0.0.1:1",
            "--connect-max-attempts",
            "2",
            "--connect-retry-delay-secs",
            "0",
        ])
        .unwrap();

        let result = connect_engine(&config).await;
        assert!(matches!(result, Err(EngineError::ConnectionError(_))));
    }
}
