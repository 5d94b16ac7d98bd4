//! Install and activate handling.
//!
//! Install pre-warms the static namespace with the shell manifest;
//! activate evicts every namespace that does not match the current
//! version strings. State transitions themselves are driven by the host,
//! this module only does the work owed at each transition.

use std::sync::Arc;

use url::Url;

use shellproxy_core::{CacheStorage, Error, WorkerConfig};

use crate::fetch::Network;
use crate::router::prewarm_one;

/// Service worker lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Install event dispatched, shell pre-warm in progress.
    Installing,
    /// Shell pre-warm complete.
    Installed,
    /// Activate event dispatched, stale namespaces being purged.
    Activating,
    /// Worker controls all traffic.
    Activated,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Installing => write!(f, "installing"),
            WorkerState::Installed => write!(f, "installed"),
            WorkerState::Activating => write!(f, "activating"),
            WorkerState::Activated => write!(f, "activated"),
        }
    }
}

/// Runs the install pre-warm and the activate purge.
pub struct Lifecycle {
    network: Arc<dyn Network>,
    cache: CacheStorage,
    upstream: Url,
    shell_urls: Vec<String>,
    cache_name: String,
    static_cache_name: String,
}

impl Lifecycle {
    /// Build the lifecycle manager from configuration.
    pub fn new(config: &WorkerConfig, network: Arc<dyn Network>, cache: CacheStorage) -> Result<Self, Error> {
        let upstream = Url::parse(&config.upstream).map_err(|e| Error::InvalidUrl(format!("upstream: {e}")))?;
        Ok(Self {
            network,
            cache,
            upstream,
            shell_urls: config.shell_urls(),
            cache_name: config.cache_name.clone(),
            static_cache_name: config.static_cache_name.clone(),
        })
    }

    /// Pre-populate the static namespace with the shell manifest.
    ///
    /// The root page is required: both offline fallbacks serve it, so a
    /// failure there aborts the install. Any other shell URL failure is
    /// logged and tolerated.
    ///
    /// # Errors
    ///
    /// Returns `Error::PrewarmFailed` if the root page cannot be cached.
    pub async fn install(&self) -> Result<(), Error> {
        tracing::info!(cache = %self.static_cache_name, "installing, caching app shell");

        for path in &self.shell_urls {
            match prewarm_one(self.network.as_ref(), &self.cache, &self.static_cache_name, &self.upstream, path).await
            {
                Ok(()) => tracing::debug!(%path, "shell URL cached"),
                Err(err) if path.as_str() == "/" => {
                    tracing::error!(%path, error = %err, "required shell URL failed, aborting install");
                    return Err(err);
                }
                Err(err) => tracing::warn!(%path, error = %err, "shell URL skipped"),
            }
        }

        Ok(())
    }

    /// Delete every namespace that is not one of the two current names.
    pub async fn activate(&self) {
        tracing::info!(cache = %self.cache_name, static_cache = %self.static_cache_name, "activating");

        for name in self.cache.keys().await {
            if name != self.cache_name && name != self.static_cache_name {
                tracing::info!(%name, "deleting old cache");
                self.cache.delete(&name).await;
            }
        }
    }
}
