// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Process configuration, read from flags with environment fallbacks.

use crate::models::backend::Backend;
use crate::services::bootstrap::RetryPolicy;
use crate::services::logging::LogFormat;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "search-api", about = "HTTP front end for document indexing and search")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "SEARCH_API_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Search engine implementation
    #[arg(long, env = "SEARCH_API_BACKEND", value_enum, default_value_t = Backend::OpenSearch)]
    pub backend: Backend,

    /// OpenSearch / Elasticsearch base URL
    #[arg(long, env = "OPENSEARCH_URL", default_value = "http://elasticsearch:9200")]
    pub opensearch_url: String,

    /// Index documents are written to and searched in
    #[arg(long, env = "SEARCH_API_INDEX", default_value = "documents")]
    pub index_name: String,

    /// Seconds to wait between startup connection attempts
    #[arg(long, env = "CONNECT_RETRY_DELAY_SECS", default_value_t = 3)]
    pub connect_retry_delay_secs: u64,

    /// Give up after this many connection attempts (unset: retry forever)
    #[arg(long, env = "CONNECT_MAX_ATTEMPTS")]
    pub connect_max_attempts: Option<u32>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            delay: Duration::from_secs(self.connect_retry_delay_secs),
            max_attempts: self.connect_max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags() {
        let config = Config::try_parse_from([
            "search-api",
            "--listen-addr",
            "127.0.0.1:9000",
            "--backend",
            "memory",
            "--opensearch-url",
            "http://localhost:9200",
            "--index-name",
            "articles",
            "--connect-retry-delay-secs",
            "1",
            "--connect-max-attempts",
            "5",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert_eq!(config.index_name, "articles");
        assert_eq!(config.log_format, LogFormat::Json);

        let policy = config.retry_policy();
        assert_eq!(policy.delay, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, Some(5));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let result = Config::try_parse_from(["search-api", "--backend", "solr"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_listen_addr() {
        let result = Config::try_parse_from(["search-api", "--listen-addr", "nowhere"]);
        assert!(result.is_err());
    }
}
