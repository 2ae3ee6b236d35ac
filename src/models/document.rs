// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One item of a `POST /documents` batch.
///
/// Missing fields decode to empty strings; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Document as stored in the search index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Assigned once when the document is first written
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

impl Document {
    /// Turn a submission into an indexable document.
    ///
    /// The id and the creation timestamp are taken together, so `created_at`
    /// reflects the moment of id assignment rather than request arrival.
    pub fn from_submission(submission: DocumentSubmission) -> Self {
        let id = Uuid::now_v7().to_string();
        Self {
            id,
            title: submission.title,
            created_at: Utc::now(),
            content: submission.content,
        }
    }
}

/// Client-facing projection of a search hit. The document id stays internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentView {
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_submission_missing_fields_default_to_empty() {
        let submission: DocumentSubmission = serde_json::from_str(r#"{"title":"only"}"#).unwrap();
        assert_eq!(submission.title, "only");
        assert_eq!(submission.content, "");
    }

    #[test]
    fn test_submission_ignores_unknown_fields() {
        let submission: DocumentSubmission =
            serde_json::from_str(r#"{"title":"a","content":"b","tags":["x"]}"#).unwrap();
        assert_eq!(submission.title, "a");
        assert_eq!(submission.content, "b");
    }

    #[test]
    fn test_submission_rejects_wrong_field_type() {
        let result = serde_json::from_str::<DocumentSubmission>(r#"{"title":42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_submission_assigns_unique_ids() {
        let ids: HashSet<String> = (0..1000)
            .map(|_| Document::from_submission(DocumentSubmission::default()).id)
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_from_submission_stamps_creation_time() {
        let before = Utc::now();
        let doc = Document::from_submission(DocumentSubmission {
            title: "Alpha".to_string(),
            content: "Beta Gamma".to_string(),
        });
        let after = Utc::now();

        assert!(doc.created_at >= before && doc.created_at <= after);
        assert_eq!(doc.title, "Alpha");
        assert_eq!(doc.content, "Beta Gamma");
    }

    #[test]
    fn test_document_serializes_with_snake_case_timestamp() {
        let doc = Document::from_submission(DocumentSubmission::default());
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("created_at").is_some());
        assert!(value.get("id").is_some());
    }

    #[test]
    fn test_view_has_no_id() {
        let doc = Document::from_submission(DocumentSubmission {
            title: "t".to_string(),
            content: "c".to_string(),
        });
        let view: DocumentView = serde_json::from_value(serde_json::to_value(&doc).unwrap()).unwrap();
        let value = serde_json::to_value(&view).unwrap();

        assert!(value.get("id").is_none());
        assert_eq!(view.created_at, doc.created_at);
    }
}
