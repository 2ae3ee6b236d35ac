// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use clap::ValueEnum;

/// Which search engine implementation serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Remote OpenSearch / Elasticsearch cluster
    #[value(name = "opensearch")]
    OpenSearch,
    /// Process-local index, lost on restart. Local development only.
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::OpenSearch => write!(f, "opensearch"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}
