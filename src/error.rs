// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error types shared by the ingestion and query paths.
//!
//! [`EngineError`] describes what went wrong at the search engine boundary.
//! [`ApiError`] is what a request handler returns; it decides the HTTP status
//! and the message the client sees.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors raised by a [`SearchEngine`](crate::services::engine::SearchEngine) implementation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The bulk write was rejected or could not be sent.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// The search request failed or was rejected.
    #[error("Query error: {0}")]
    QueryError(String),

    /// The engine answered with a body we could not understand.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A document could not be serialized for the engine.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EngineError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-level error. Validation variants never reach the engine.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Query not specified")]
    QueryNotSpecified,

    #[error("Failed to create documents: {0}")]
    Indexing(#[source] EngineError),

    #[error("Search failed: {0}")]
    Search(#[source] EngineError),

    /// A stored hit failed to deserialize under the strict projection policy.
    #[error("Failed to project search hit: {0}")]
    Projection(String),
}

impl ApiError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::MalformedBody(_) | ApiError::QueryNotSpecified)
    }

    pub fn status(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message returned to the client. Backend detail is never included.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::MalformedBody(_) => "Malformed request body",
            ApiError::QueryNotSpecified => "Query not specified",
            ApiError::Indexing(_) => "Failed to create documents",
            ApiError::Search(_) | ApiError::Projection(_) => "Something went wrong",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        let body = ErrorResponse {
            error: self.public_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
