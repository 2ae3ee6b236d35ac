// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::document::DocumentView;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page offset used when `skip` is absent or not an integer
pub const DEFAULT_SKIP: i64 = 0;
/// Page size used when `take` is absent or not an integer
pub const DEFAULT_TAKE: i64 = 10;

/// Raw `GET /search` parameters, exactly as they appeared in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query (required, non-empty)
    pub query: Option<String>,
    /// Result offset (default: 0)
    pub skip: Option<String>,
    /// Page size (default: 10)
    pub take: Option<String>,
}

impl SearchParams {
    /// Read parameters from a raw query string.
    ///
    /// The first occurrence of a repeated key wins. Values are percent-decoded
    /// and `+` decodes to a space.
    pub fn from_query_string(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(raw) = raw else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "skip" => &mut params.skip,
                "take" => &mut params.take,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }
}

/// Validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Passed to the engine as the result offset
    pub skip: i64,
    /// Passed to the engine as the page size, without clamping
    pub take: i64,
}

/// Body of a successful `GET /search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Engine-reported processing time in milliseconds, as a decimal string
    pub time: String,
    /// Total number of matching documents, as a decimal string
    pub hits: String,
    /// Projected hits in engine relevance order
    pub documents: Vec<DocumentView>,
}
