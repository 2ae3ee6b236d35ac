// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Free-text search: validate parameters, build the fuzzy multi-field query,
//! and project raw hits into the response shape.
//!
//! Two lenient policies live here and are deliberate:
//! * pagination parameters fall back to their defaults when they do not parse
//!   ([`default_on_parse_failure`]);
//! * hits whose stored source does not deserialize are dropped
//!   ([`ProjectionPolicy::SkipOnDeserializeFailure`]).

use crate::error::ApiError;
use crate::models::document::DocumentView;
use crate::models::search::{
    SearchParams, SearchRequest, SearchResponse, DEFAULT_SKIP, DEFAULT_TAKE,
};
use crate::services::engine::{MatchQuery, MinimumShouldMatch, SearchEngine};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Document fields the query is matched against
pub const SEARCH_FIELDS: [&str; 2] = ["title", "content"];
/// Edit distance tolerated per query term
pub const FUZZINESS: u32 = 2;
/// Terms that must match in multi-term queries
pub const MINIMUM_SHOULD_MATCH: MinimumShouldMatch = MinimumShouldMatch(2);

/// What to do with a hit whose stored source cannot be projected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectionPolicy {
    /// Drop the hit and keep going. Nothing about the failure reaches the client.
    #[default]
    SkipOnDeserializeFailure,
    /// Fail the whole request.
    FailOnDeserializeFailure,
}

/// Parse an integer parameter, using `default` when absent or malformed.
pub fn default_on_parse_failure(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(default)
}

/// Check the raw parameters. A missing or empty `query` is the only failure.
pub fn validate_params(params: SearchParams) -> Result<SearchRequest, ApiError> {
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::QueryNotSpecified)?;

    Ok(SearchRequest {
        query,
        skip: default_on_parse_failure(params.skip.as_deref(), DEFAULT_SKIP),
        take: default_on_parse_failure(params.take.as_deref(), DEFAULT_TAKE),
    })
}

pub fn build_match_query(text: &str) -> MatchQuery {
    MatchQuery {
        text: text.to_string(),
        fields: SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
        fuzziness: FUZZINESS,
        minimum_should_match: MINIMUM_SHOULD_MATCH,
    }
}

/// Project raw hit sources, preserving engine order.
pub fn project_hits(
    sources: Vec<Value>,
    policy: ProjectionPolicy,
) -> Result<Vec<DocumentView>, ApiError> {
    let mut documents = Vec::with_capacity(sources.len());

    for (position, source) in sources.into_iter().enumerate() {
        match serde_json::from_value::<DocumentView>(source) {
            Ok(view) => documents.push(view),
            Err(e) => match policy {
                ProjectionPolicy::SkipOnDeserializeFailure => {
                    warn!(position, error = %e, "Skipping hit that failed to deserialize");
                }
                ProjectionPolicy::FailOnDeserializeFailure => {
                    return Err(ApiError::Projection(format!("hit {position}: {e}")));
                }
            },
        }
    }

    Ok(documents)
}

/// Run a validated search and shape the response.
///
/// Ranking and pagination belong to the engine; results are never re-sorted.
#[instrument(skip(engine, request), fields(skip = request.skip, take = request.take))]
pub async fn search_documents(
    engine: &dyn SearchEngine,
    request: &SearchRequest,
    policy: ProjectionPolicy,
) -> Result<SearchResponse, ApiError> {
    let query = build_match_query(&request.query);

    let hits = engine
        .search(&query, request.skip, request.take)
        .await
        .map_err(ApiError::Search)?;

    debug!(
        took_millis = hits.took_millis,
        total_hits = hits.total_hits,
        returned = hits.sources.len(),
        "Search completed"
    );

    Ok(SearchResponse {
        time: hits.took_millis.to_string(),
        hits: hits.total_hits.to_string(),
        documents: project_hits(hits.sources, policy)?,
    })
}
