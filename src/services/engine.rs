// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Boundary between the request components and the search engine.
//!
//! Only two capabilities are required of a backing store: a bulk write and a
//! ranked query with offset and limit. Engine-specific request and response
//! shapes stay inside the implementations.

use crate::error::EngineError;
use crate::models::document::Document;
use async_trait::async_trait;
use serde_json::Value;

/// Minimum-should-match threshold.
///
/// The threshold is capped by the number of clauses the query produces, so a
/// single-term query with a threshold of 2 still needs only that one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumShouldMatch(pub u32);

impl MinimumShouldMatch {
    /// Number of clauses that must match when the query has `clauses` clauses.
    pub fn required(&self, clauses: usize) -> usize {
        (self.0 as usize).min(clauses)
    }

    /// Render as an Elasticsearch-style `minimum_should_match` value.
    ///
    /// `"N-1<N"` reads "when there are more than N-1 optional clauses require N,
    /// otherwise require all of them", which is `min(N, clauses)`.
    pub fn to_engine_value(&self) -> String {
        match self.0 {
            0 | 1 => self.0.to_string(),
            n => format!("{}<{}", n - 1, n),
        }
    }
}

/// Engine-neutral description of a fuzzy multi-field match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub text: String,
    pub fields: Vec<String>,
    /// Maximum edit distance per term
    pub fuzziness: u32,
    pub minimum_should_match: MinimumShouldMatch,
}

/// Raw result page as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub took_millis: u64,
    pub total_hits: u64,
    /// Stored source of each hit, in engine relevance order
    pub sources: Vec<Value>,
}

/// Outcome of a bulk write that the engine accepted.
///
/// Item-level failures do not make the call fail; they are counted so the
/// caller can log them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub submitted: usize,
    pub failed_items: usize,
}

/// Abstract interface to the search engine.
///
/// Implementations must be `Send + Sync`; a single instance is shared by every
/// in-flight request.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Index all documents in a single bulk request.
    ///
    /// The write is not atomic: on error, any subset of the documents may
    /// already have been written.
    async fn bulk_index(&self, documents: &[Document]) -> Result<BulkSummary, EngineError>;

    /// Run a ranked query, returning at most `size` hits starting at `from`.
    ///
    /// `from` and `size` are handed to the engine untouched.
    async fn search(
        &self,
        query: &MatchQuery,
        from: i64,
        size: i64,
    ) -> Result<SearchHits, EngineError>;
}
