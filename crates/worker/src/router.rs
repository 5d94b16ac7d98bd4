//! Tiered fetch routing.
//!
//! Given a classified request, pick one of four strategies and produce a
//! response. All network failures are recovered locally (cached root or a
//! synthesized 503); nothing escalates past the router. Caching is
//! best-effort: a failed cache put is logged and the network response is
//! still returned.

use std::sync::Arc;

use reqwest::StatusCode;

use shellproxy_core::{CacheStorage, Error, WorkerConfig};

use crate::classify::{Classifier, RoutingDecision};
use crate::fetch::{FetchMode, Network, WorkerRequest, WorkerResponse, cache_key};

const OFFLINE_PAGE_BODY: &str = "Page not available offline";
const OFFLINE_ASSET_BODY: &str = "Asset not available offline";

/// Result of routing one intercepted request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Do not intercept; the host forwards the original request unmodified.
    Passthrough,
    /// Serve this response to the caller.
    Respond(WorkerResponse),
}

/// Routes intercepted requests through the tiered cache policy.
pub struct FetchRouter {
    classifier: Classifier,
    network: Arc<dyn Network>,
    cache: CacheStorage,
    static_cache_name: String,
}

impl FetchRouter {
    /// Build a router over the given transport and cache storage.
    pub fn new(config: &WorkerConfig, network: Arc<dyn Network>, cache: CacheStorage) -> Self {
        Self {
            classifier: Classifier::new(config.passthrough_hosts.clone()),
            network,
            cache,
            static_cache_name: config.static_cache_name.clone(),
        }
    }

    /// Handle one intercepted request.
    ///
    /// Each invocation is logically independent; the only shared state is
    /// the cache storage, which is safe for concurrent get/put.
    pub async fn handle(&self, request: &WorkerRequest) -> FetchOutcome {
        let decision = self.classifier.classify(&request.method, &request.url);
        tracing::debug!(url = %request.url, %decision, "routing request");

        match decision {
            RoutingDecision::ApiPassthrough => FetchOutcome::Passthrough,
            RoutingDecision::NoCacheDocument => FetchOutcome::Respond(self.network_first(request).await),
            RoutingDecision::CacheableAsset => FetchOutcome::Respond(self.cache_first(request).await),
            RoutingDecision::GenericNavigation => FetchOutcome::Respond(self.network_first(request).await),
        }
    }

    /// Network fetch with no-cache directives; cached root as fallback.
    async fn network_first(&self, request: &WorkerRequest) -> WorkerResponse {
        match self.network.fetch(request, FetchMode::NoCache).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "network-first fetch failed, falling back");
                self.root_fallback().await
            }
        }
    }

    /// Cache-first lookup in the static namespace, filling on miss.
    async fn cache_first(&self, request: &WorkerRequest) -> WorkerResponse {
        let key = cache_key(&request.url);
        let statics = self.cache.open(&self.static_cache_name).await;

        if let Some(entry) = statics.get(&key).await {
            tracing::debug!(%key, "static cache hit");
            return WorkerResponse::from_entry(&entry);
        }

        match self.network.fetch(request, FetchMode::Default).await {
            Ok(response) => {
                // Only 200s are cached; store the copy before the response
                // leaves the router.
                if response.status == StatusCode::OK
                    && let Err(err) = statics.put(&key, response.to_entry()).await
                {
                    tracing::warn!(%key, error = %err, "cache put failed, serving uncached");
                }
                response
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "asset fetch failed");
                WorkerResponse::offline(OFFLINE_ASSET_BODY)
            }
        }
    }

    /// Cached root page, else a synthesized 503.
    async fn root_fallback(&self) -> WorkerResponse {
        let statics = self.cache.open(&self.static_cache_name).await;
        match statics.get("/").await {
            Some(entry) => WorkerResponse::from_entry(&entry),
            None => WorkerResponse::offline(OFFLINE_PAGE_BODY),
        }
    }

    /// Cache storage handle shared with the lifecycle manager.
    pub fn cache(&self) -> &CacheStorage {
        &self.cache
    }
}

/// Fetch a shell URL and store it, used by install pre-warm.
pub(crate) async fn prewarm_one(
    network: &dyn Network, cache: &CacheStorage, static_cache_name: &str, base: &url::Url, path: &str,
) -> Result<(), Error> {
    let url = base
        .join(path)
        .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;
    let request = WorkerRequest::get(url);

    let response = network
        .fetch(&request, FetchMode::Default)
        .await
        .map_err(|e| Error::PrewarmFailed { url: path.to_string(), reason: e.to_string() })?;

    if !response.status.is_success() {
        return Err(Error::PrewarmFailed { url: path.to_string(), reason: format!("status {}", response.status) });
    }

    let statics = cache.open(static_cache_name).await;
    statics.put(path, response.to_entry()).await?;
    Ok(())
}
