//! shell-proxy entry point.
//!
//! Boots the caching proxy in front of the configured upstream origin:
//! load config, pre-warm the app shell (install), purge stale cache
//! namespaces (activate), then serve.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::EnvFilter;
use url::Url;

use shellproxy_core::WorkerConfig;
use shellproxy_worker::{HttpNetwork, ServiceWorker};

mod error;
mod proxy;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = WorkerConfig::load().context("failed to load configuration")?;
    let upstream = Url::parse(&config.upstream).context("invalid upstream URL")?;

    tracing::info!(
        upstream = %upstream,
        listen_addr = %config.listen_addr,
        cache = %config.cache_name,
        static_cache = %config.static_cache_name,
        "starting shell-proxy"
    );

    let network = Arc::new(HttpNetwork::new(&config)?);
    let worker = Arc::new(ServiceWorker::new(&config, network)?);

    worker.on_install().await.context("app shell pre-warm failed")?;
    worker.on_activate().await;

    let state = proxy::AppState::new(worker, upstream, &config)?;
    let app = Router::new().fallback(proxy::intercept).with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
