//! Test-only scripted transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use tokio::sync::Mutex;

use shellproxy_core::Error;

use crate::fetch::{FetchMode, Network, WorkerRequest, WorkerResponse, cache_key};

/// Scripted transport: per-key canned results plus a call counter.
///
/// Keys are cache keys (path + query), so scripts are origin-independent
/// like the router's own cache lookups.
pub(crate) struct MockNetwork {
    responses: Mutex<HashMap<String, Result<WorkerResponse, String>>>,
    calls: AtomicUsize,
}

impl MockNetwork {
    pub(crate) fn new() -> Self {
        Self { responses: Mutex::new(HashMap::new()), calls: AtomicUsize::new(0) }
    }

    pub(crate) async fn respond(&self, key: &str, status: u16, body: &str) {
        let response = WorkerResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        };
        self.responses.lock().await.insert(key.to_string(), Ok(response));
    }

    pub(crate) async fn fail(&self, key: &str, reason: &str) {
        self.responses.lock().await.insert(key.to_string(), Err(reason.to_string()));
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &WorkerRequest, _mode: FetchMode) -> Result<WorkerResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = cache_key(&request.url);
        match self.responses.lock().await.get(&key) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(Error::Network(reason.clone())),
            None => Err(Error::Network(format!("no scripted response for {key}"))),
        }
    }
}
