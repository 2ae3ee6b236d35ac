// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Document ingestion: turn submissions into identified documents and write
//! them with a single bulk call.

use crate::error::ApiError;
use crate::models::document::{Document, DocumentSubmission};
use crate::services::engine::SearchEngine;
use tracing::{debug, info, instrument};

/// Index a batch of submissions, returning how many documents were submitted.
///
/// An empty batch is a no-op and never reaches the engine. A failed bulk call
/// is reported as one [`ApiError::Indexing`] for the whole batch, even though
/// the engine may have applied part of it.
#[instrument(skip(engine, submissions), fields(count = submissions.len()))]
pub async fn ingest_documents(
    engine: &dyn SearchEngine,
    submissions: Vec<DocumentSubmission>,
) -> Result<usize, ApiError> {
    if submissions.is_empty() {
        debug!("Empty batch, skipping bulk write");
        return Ok(0);
    }

    let documents: Vec<Document> = submissions
        .into_iter()
        .map(Document::from_submission)
        .collect();

    let summary = engine
        .bulk_index(&documents)
        .await
        .map_err(ApiError::Indexing)?;

    info!(
        submitted = summary.submitted,
        failed_items = summary.failed_items,
        "Indexed documents"
    );

    Ok(summary.submitted)
}
