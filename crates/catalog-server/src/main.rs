//! Catalog mirror entry point.
//!
//! Loads configuration from the environment, starts the background refresh
//! task, and serves the read-only API until `Ctrl-C`.
//!
//! ```text
//! remote file host --> refresh task --> snapshot store <-- HTTP handlers
//! ```
//!
//! A failed reload never stops the process. The API keeps answering from
//! the last good snapshot, or with 503 until the first one arrives.

use std::sync::Arc;

use anyhow::Context;
use catalog_server::{AppConfig, AppState, LogFormat, start_server};
use catalog_store::{CatalogQuery, HttpSource, SnapshotLoader, SnapshotStore, spawn_refresh};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    init_logging(config.log_format);

    info!(
        port = config.server.port,
        source = config.source_url,
        collection = config.mapping.collection,
        refresh_secs = config.refresh_interval.as_secs(),
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        "catalog-server starting"
    );

    let store = Arc::new(SnapshotStore::new());
    let source = HttpSource::new(config.source_url.as_str(), config.fetch_timeout)
        .context("building HTTP client")?;
    let loader = Arc::new(SnapshotLoader::new(
        source,
        config.mapping.clone(),
        Arc::clone(&store),
    ));

    let shutdown = CancellationToken::new();
    let refresh = spawn_refresh(loader, config.refresh_interval, shutdown.child_token());

    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for shutdown signal");
            return;
        }
        info!("shutdown signal received");
        ctrl_c.cancel();
    });

    let state = Arc::new(AppState::new(
        CatalogQuery::new(store, config.mapping.clone()),
        config.source_label.clone(),
    ));

    let served = start_server(&config.server, state, shutdown.clone()).await;

    shutdown.cancel();
    refresh.await.context("refresh task panicked")?;
    served.context("serving catalog API")?;

    info!("catalog-server shutdown complete");
    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
