// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! OpenSearch / Elasticsearch implementation of [`SearchEngine`].

use crate::error::EngineError;
use crate::models::document::Document;
use crate::services::engine::{BulkSummary, MatchQuery, SearchEngine, SearchHits};
use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Engine client bound to a single index.
///
/// The underlying transport is safe to share between concurrent requests.
pub struct OpenSearchEngine {
    client: OpenSearch,
    index_name: String,
}

impl OpenSearchEngine {
    /// Build a client for `url`. No request is made until [`ping`](Self::ping).
    pub fn new(url: &str, index_name: impl Into<String>) -> Result<Self, EngineError> {
        let parsed_url = Url::parse(url).map_err(|e| EngineError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| EngineError::connection(e.to_string()))?;

        let index_name = index_name.into();
        info!(url = %url, index = %index_name, "Created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
            index_name,
        })
    }

    /// Check that the cluster answers.
    pub async fn ping(&self) -> Result<(), EngineError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| EngineError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(EngineError::connection(format!(
                "Ping returned status {}",
                status
            )));
        }

        Ok(())
    }

    /// NDJSON action/source pairs for a bulk index request.
    fn bulk_body(documents: &[Document]) -> Result<Vec<JsonBody<Value>>, EngineError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for doc in documents {
            let source = serde_json::to_value(doc)
                .map_err(|e| EngineError::SerializationError(e.to_string()))?;
            body.push(json!({ "index": { "_id": doc.id } }).into());
            body.push(source.into());
        }
        Ok(body)
    }

    /// Search request body for a fuzzy multi-field match.
    fn search_body(query: &MatchQuery) -> Value {
        json!({
            "query": {
                "multi_match": {
                    "query": query.text,
                    "fields": query.fields,
                    "fuzziness": query.fuzziness.to_string(),
                    "minimum_should_match": query.minimum_should_match.to_engine_value()
                }
            },
            "track_total_hits": true
        })
    }

    /// Count items of a bulk response that carry an `error` object.
    fn failed_bulk_items(body: &Value) -> usize {
        if !body.get("errors").and_then(Value::as_bool).unwrap_or(false) {
            return 0;
        }

        body.get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.get("index").and_then(|i| i.get("error")).is_some())
                    .count()
            })
            .unwrap_or(0)
    }

    fn parse_search_response(body: &Value) -> Result<SearchHits, EngineError> {
        let took_millis = body
            .get("took")
            .and_then(Value::as_u64)
            .ok_or_else(|| EngineError::parse("response has no 'took'"))?;

        let hits = body
            .get("hits")
            .ok_or_else(|| EngineError::parse("response has no 'hits'"))?;

        // Elasticsearch 7+ and OpenSearch report `{"value": n, "relation": ..}`,
        // older clusters report a bare number.
        let total_hits = match hits.get("total") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(total) => total.get("value").and_then(Value::as_u64),
            None => None,
        }
        .ok_or_else(|| EngineError::parse("response has no 'hits.total'"))?;

        let sources = hits
            .get("hits")
            .and_then(Value::as_array)
            .map(|hits| {
                hits.iter()
                    .map(|hit| hit.get("_source").cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .unwrap_or_default();

        Ok(SearchHits {
            took_millis,
            total_hits,
            sources,
        })
    }
}

#[async_trait]
impl SearchEngine for OpenSearchEngine {
    #[instrument(skip(self, documents), fields(index = %self.index_name, count = documents.len()))]
    async fn bulk_index(&self, documents: &[Document]) -> Result<BulkSummary, EngineError> {
        let body = Self::bulk_body(documents)?;

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_name))
            .body(body)
            .send()
            .await
            .map_err(|e| EngineError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(EngineError::bulk_index(format!(
                "Bulk failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| EngineError::parse(e.to_string()))?;

        let failed_items = Self::failed_bulk_items(&response_body);
        if failed_items > 0 {
            warn!(failed_items, "Bulk request partially applied");
        }

        debug!("Bulk request accepted");
        Ok(BulkSummary {
            submitted: documents.len(),
            failed_items,
        })
    }

    #[instrument(skip(self, query), fields(index = %self.index_name))]
    async fn search(
        &self,
        query: &MatchQuery,
        from: i64,
        size: i64,
    ) -> Result<SearchHits, EngineError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_name]))
            .from(from)
            .size(size)
            .body(Self::search_body(query))
            .send()
            .await
            .map_err(|e| EngineError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(EngineError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| EngineError::parse(e.to_string()))?;

        Self::parse_search_response(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentSubmission;
    use crate::services::engine::MinimumShouldMatch;

    fn sample_query(text: &str) -> MatchQuery {
        MatchQuery {
            text: text.to_string(),
            fields: vec!["title".to_string(), "content".to_string()],
            fuzziness: 2,
            minimum_should_match: MinimumShouldMatch(2),
        }
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = OpenSearchEngine::new("not a url", "documents");
        assert!(matches!(result, Err(EngineError::ConnectionError(_))));
    }

    #[test]
    fn test_bulk_body_pairs_action_and_source() {
        let docs = vec![
            Document::from_submission(DocumentSubmission {
                title: "a".to_string(),
                content: "b".to_string(),
            }),
            Document::from_submission(DocumentSubmission::default()),
        ];

        let body = OpenSearchEngine::bulk_body(&docs).unwrap();
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn test_search_body_shape() {
        let body = OpenSearchEngine::search_body(&sample_query("beta gamma"));
        let multi_match = &body["query"]["multi_match"];

        assert_eq!(multi_match["query"], "beta gamma");
        assert_eq!(multi_match["fields"], json!(["title", "content"]));
        assert_eq!(multi_match["fuzziness"], "2");
        assert_eq!(multi_match["minimum_should_match"], "1<2");
        // Totals past 10000 are only exact when tracking is requested
        assert_eq!(body["track_total_hits"], true);
    }

    #[test]
    fn test_failed_bulk_items_counts_item_errors() {
        let body = json!({
            "took": 3,
            "errors": true,
            "items": [
                { "index": { "_id": "1", "status": 201 } },
                { "index": { "_id": "2", "status": 400, "error": { "type": "mapper_parsing_exception" } } }
            ]
        });
        assert_eq!(OpenSearchEngine::failed_bulk_items(&body), 1);
    }

    #[test]
    fn test_failed_bulk_items_without_errors_flag() {
        let body = json!({ "took": 3, "errors": false, "items": [] });
        assert_eq!(OpenSearchEngine::failed_bulk_items(&body), 0);
    }

    #[test]
    fn test_parse_search_response_object_total() {
        let body = json!({
            "took": 7,
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "hits": [
                    { "_id": "x", "_score": 1.5, "_source": { "title": "Alpha" } },
                    { "_id": "y", "_score": 0.5, "_source": { "title": "Beta" } }
                ]
            }
        });

        let hits = OpenSearchEngine::parse_search_response(&body).unwrap();
        assert_eq!(hits.took_millis, 7);
        assert_eq!(hits.total_hits, 42);
        assert_eq!(hits.sources.len(), 2);
        assert_eq!(hits.sources[0]["title"], "Alpha");
        assert_eq!(hits.sources[1]["title"], "Beta");
    }

    #[test]
    fn test_parse_search_response_numeric_total() {
        let body = json!({ "took": 1, "hits": { "total": 3, "hits": [] } });

        let hits = OpenSearchEngine::parse_search_response(&body).unwrap();
        assert_eq!(hits.total_hits, 3);
        assert!(hits.sources.is_empty());
    }

    #[test]
    fn test_parse_search_response_missing_source_is_null() {
        let body = json!({ "took": 1, "hits": { "total": 1, "hits": [ { "_id": "x" } ] } });

        let hits = OpenSearchEngine::parse_search_response(&body).unwrap();
        assert_eq!(hits.sources, vec![Value::Null]);
    }

    #[test]
    fn test_parse_search_response_missing_took() {
        let body = json!({ "hits": { "total": 1, "hits": [] } });
        let result = OpenSearchEngine::parse_search_response(&body);
        assert!(matches!(result, Err(EngineError::ParseError(_))));
    }

    #[tokio::test]
    #[ignore] // Requires OpenSearch running
    async fn test_ping_live_cluster() {
        let engine = OpenSearchEngine::new("http://127.0.0.1:9200", "documents").unwrap();
        assert!(engine.ping().await.is_ok());
    }
}
