//! The service worker facade.
//!
//! One method per host-runtime event, so any platform adapter (an HTTP
//! middleware here, a browser shim elsewhere) can wire these into its own
//! event system.

use std::sync::Arc;

use tokio::sync::RwLock;

use shellproxy_core::{CacheStorage, Error, WorkerConfig};

use crate::fetch::{Network, WorkerRequest};
use crate::lifecycle::{Lifecycle, WorkerState};
use crate::push::{ClientCommand, Notification, PushHandler};
use crate::router::{FetchOutcome, FetchRouter};

/// The assembled worker: classifier, router, lifecycle and push surface
/// over one shared cache storage.
pub struct ServiceWorker {
    router: FetchRouter,
    lifecycle: Lifecycle,
    push: PushHandler,
    state: RwLock<WorkerState>,
}

impl ServiceWorker {
    /// Assemble a worker from configuration and a transport.
    pub fn new(config: &WorkerConfig, network: Arc<dyn Network>) -> Result<Self, Error> {
        let cache = CacheStorage::new(config.cache_max_entry_bytes);
        let router = FetchRouter::new(config, Arc::clone(&network), cache.clone());
        let lifecycle = Lifecycle::new(config, network, cache)?;

        Ok(Self { router, lifecycle, push: PushHandler::new(config), state: RwLock::new(WorkerState::Installing) })
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// Install: pre-warm the app shell, then skip straight past waiting.
    ///
    /// # Errors
    ///
    /// Returns `Error::PrewarmFailed` if the root page cannot be cached;
    /// the worker stays in `Installing`.
    pub async fn on_install(&self) -> Result<(), Error> {
        self.lifecycle.install().await?;
        *self.state.write().await = WorkerState::Installed;
        tracing::info!("install complete, skipping waiting");
        Ok(())
    }

    /// Activate: purge stale namespaces and take control of all traffic.
    pub async fn on_activate(&self) {
        *self.state.write().await = WorkerState::Activating;
        self.lifecycle.activate().await;
        *self.state.write().await = WorkerState::Activated;
        tracing::info!("activation complete, claiming clients");
    }

    /// Route one intercepted request.
    pub async fn on_fetch(&self, request: &WorkerRequest) -> FetchOutcome {
        self.router.handle(request).await
    }

    /// Build the notification for a push event.
    pub fn on_push(&self, payload: Option<&[u8]>) -> Notification {
        self.push.on_push(payload)
    }

    /// Resolve a notification click.
    pub fn on_notification_click(&self, action: &str) -> Option<ClientCommand> {
        self.push.on_notification_click(action)
    }

    /// Background sync: accepted and currently a no-op.
    pub fn on_sync(&self, tag: &str) {
        if tag == "background-sync" {
            tracing::debug!(%tag, "background sync complete");
        } else {
            tracing::debug!(%tag, "ignoring unknown sync tag");
        }
    }

    /// Shared cache storage handle.
    pub fn cache(&self) -> &CacheStorage {
        self.router.cache()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockNetwork;
    use bytes::Bytes;
    use reqwest::StatusCode;
    use url::Url;

    async fn scripted_shell(network: &MockNetwork, config: &WorkerConfig) {
        for path in config.shell_urls() {
            network.respond(&path, 200, "shell bytes").await;
        }
    }

    fn req(url: &str) -> WorkerRequest {
        WorkerRequest::get(Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_lifecycle_states() {
        let config = WorkerConfig::default();
        let network = Arc::new(MockNetwork::new());
        scripted_shell(&network, &config).await;

        let worker = ServiceWorker::new(&config, network as Arc<dyn Network>).unwrap();
        assert_eq!(worker.state().await, WorkerState::Installing);

        worker.on_install().await.unwrap();
        assert_eq!(worker.state().await, WorkerState::Installed);

        worker.on_activate().await;
        assert_eq!(worker.state().await, WorkerState::Activated);
    }

    #[tokio::test]
    async fn test_failed_install_keeps_installing_state() {
        let config = WorkerConfig::default();
        let network = Arc::new(MockNetwork::new());
        // Nothing scripted: every shell fetch fails, including "/".

        let worker = ServiceWorker::new(&config, network as Arc<dyn Network>).unwrap();
        assert!(worker.on_install().await.is_err());
        assert_eq!(worker.state().await, WorkerState::Installing);
    }

    #[tokio::test]
    async fn test_offline_navigation_serves_prewarmed_shell() {
        let config = WorkerConfig::default();
        let network = Arc::new(MockNetwork::new());
        scripted_shell(&network, &config).await;

        let worker = ServiceWorker::new(&config, Arc::clone(&network) as Arc<dyn Network>).unwrap();
        worker.on_install().await.unwrap();
        worker.on_activate().await;

        // Network goes dark after install.
        network.fail("/", "offline").await;

        let FetchOutcome::Respond(response) = worker.on_fetch(&req("http://localhost:3000/")).await else {
            panic!("expected response");
        };
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Bytes::from("shell bytes"));
    }

    #[tokio::test]
    async fn test_prewarmed_icon_served_without_network() {
        let config = WorkerConfig::default();
        let network = Arc::new(MockNetwork::new());
        scripted_shell(&network, &config).await;

        let worker = ServiceWorker::new(&config, Arc::clone(&network) as Arc<dyn Network>).unwrap();
        worker.on_install().await.unwrap();
        worker.on_activate().await;

        let calls_after_install = network.call_count();
        let FetchOutcome::Respond(response) =
            worker.on_fetch(&req("http://localhost:3000/icons/icon-192x192-20250112.png")).await
        else {
            panic!("expected response");
        };
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(network.call_count(), calls_after_install);
    }

    #[tokio::test]
    async fn test_activation_purges_previous_version() {
        let config = WorkerConfig {
            cache_name: "shellproxy-v2".into(),
            static_cache_name: "shellproxy-static-v2".into(),
            ..Default::default()
        };
        let network = Arc::new(MockNetwork::new());
        scripted_shell(&network, &config).await;

        let worker = ServiceWorker::new(&config, network as Arc<dyn Network>).unwrap();
        worker.cache().open("shellproxy-static-v1").await;

        worker.on_install().await.unwrap();
        worker.on_activate().await;

        let mut names = worker.cache().keys().await;
        names.sort();
        assert_eq!(names, vec!["shellproxy-static-v2".to_string()]);
    }

    #[tokio::test]
    async fn test_push_surface_wired_through() {
        let config = WorkerConfig::default();
        let network = Arc::new(MockNetwork::new());
        let worker = ServiceWorker::new(&config, network as Arc<dyn Network>).unwrap();

        assert_eq!(worker.on_push(Some(b"pickup scheduled")).body, "pickup scheduled");
        assert_eq!(worker.on_notification_click("view"), Some(ClientCommand::OpenWindow("/".into())));
        worker.on_sync("background-sync");
    }
}
