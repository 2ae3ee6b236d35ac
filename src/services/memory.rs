// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Process-local [`SearchEngine`] used by the test suite and by
//! `--backend memory` for running without a cluster.
//!
//! Matching follows the fuzzy multi-field strategy closely enough for
//! behavioural tests: lower-cased alphanumeric terms, Levenshtein distance per
//! term, and the minimum-should-match threshold applied per field.

use crate::error::EngineError;
use crate::models::document::Document;
use crate::services::engine::{BulkSummary, MatchQuery, SearchEngine, SearchHits};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryEngine {
    documents: RwLock<Vec<Document>>,
    unavailable: AtomicBool,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the engine were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of everything written so far, in write order.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    fn check_available(&self) -> Result<(), EngineError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EngineError::connection("in-memory engine marked unavailable"));
        }
        Ok(())
    }
}

fn field_value<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    match field {
        "title" => Some(&doc.title),
        "content" => Some(&doc.content),
        _ => None,
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Number of query terms with a fuzzy match among the field tokens.
fn matched_terms(terms: &[String], field_tokens: &[String], fuzziness: usize) -> usize {
    terms
        .iter()
        .filter(|term| {
            field_tokens
                .iter()
                .any(|token| levenshtein(term, token) <= fuzziness)
        })
        .count()
}

/// Best per-field score, or `None` when no field reaches the threshold.
fn score(doc: &Document, query: &MatchQuery, terms: &[String]) -> Option<usize> {
    let required = query.minimum_should_match.required(terms.len()).max(1);

    query
        .fields
        .iter()
        .filter_map(|field| field_value(doc, field))
        .map(|value| matched_terms(terms, &tokenize(value), query.fuzziness as usize))
        .filter(|&matched| matched >= required)
        .max()
}

#[async_trait]
impl SearchEngine for InMemoryEngine {
    async fn bulk_index(&self, documents: &[Document]) -> Result<BulkSummary, EngineError> {
        self.check_available()?;

        let mut stored = self.documents.write().await;
        for doc in documents {
            match stored.iter_mut().find(|existing| existing.id == doc.id) {
                Some(existing) => *existing = doc.clone(),
                None => stored.push(doc.clone()),
            }
        }

        Ok(BulkSummary {
            submitted: documents.len(),
            failed_items: 0,
        })
    }

    async fn search(
        &self,
        query: &MatchQuery,
        from: i64,
        size: i64,
    ) -> Result<SearchHits, EngineError> {
        self.check_available()?;

        if from < 0 {
            return Err(EngineError::query(format!(
                "[from] parameter cannot be negative, found [{}]",
                from
            )));
        }
        if size < 0 {
            return Err(EngineError::query(format!(
                "[size] parameter cannot be negative, found [{}]",
                size
            )));
        }

        let started = Instant::now();
        let terms = tokenize(&query.text);
        let stored = self.documents.read().await;

        let mut ranked: Vec<(usize, usize)> = stored
            .iter()
            .enumerate()
            .filter_map(|(position, doc)| score(doc, query, &terms).map(|s| (s, position)))
            .collect();
        // Stable sort keeps write order among equal scores
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let sources = ranked
            .iter()
            .skip(from as usize)
            .take(size as usize)
            .map(|&(_, position)| serde_json::to_value(&stored[position]))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::SerializationError(e.to_string()))?;

        Ok(SearchHits {
            took_millis: started.elapsed().as_millis() as u64,
            total_hits: ranked.len() as u64,
            sources,
        })
    }
}
