// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use search_api::app::{connect_engine, create_router, AppState, VERSION};
use search_api::config::Config;
use search_api::services::logging::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly
    dotenv::dotenv().ok();

    let config = Config::parse();
    init_tracing(config.log_format);

    info!(
        backend = %config.backend,
        opensearch_url = %config.opensearch_url,
        index = %config.index_name,
        "Starting search-api v{}",
        VERSION
    );

    // No request is served until the engine answers
    let engine = connect_engine(&config)
        .await
        .context("Failed to connect to search engine")?;

    let app = create_router(AppState::new(engine, config.backend));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    info!(addr = %config.listen_addr, "search-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("search-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
