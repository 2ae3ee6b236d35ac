// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod bootstrap;
pub mod engine;
pub mod ingest;
pub mod logging;
pub mod memory;
pub mod opensearch;
pub mod query;
