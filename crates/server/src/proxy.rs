//! The axum front end: every inbound request goes through the worker's
//! fetch handler; passthrough traffic is relayed to the upstream origin
//! with method, headers and body intact.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use url::Url;

use shellproxy_core::WorkerConfig;
use shellproxy_worker::{FetchOutcome, ServiceWorker, WorkerRequest};

use crate::error::ServeError;

/// Headers that must not be relayed between hops.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Shared state for the request handler.
#[derive(Clone)]
pub struct AppState {
    pub worker: Arc<ServiceWorker>,
    pub http: reqwest::Client,
    pub upstream: Url,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Build the forwarding client: no redirect following and no
    /// transparent decompression, so passthrough responses are relayed
    /// byte-for-byte.
    pub fn new(worker: Arc<ServiceWorker>, upstream: Url, config: &WorkerConfig) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .gzip(false)
            .brotli(false)
            .deflate(false)
            .build()?;
        Ok(Self { worker, http, upstream, max_body_bytes: config.max_body_bytes })
    }
}

/// Catch-all handler: classify and route through the worker.
pub async fn intercept(State(state): State<AppState>, request: Request) -> Response {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let url = match state.upstream.join(&path_and_query) {
        Ok(url) => url,
        Err(e) => return ServeError::Target(format!("{path_and_query}: {e}")).into_response(),
    };

    let worker_request = WorkerRequest { method: request.method().clone(), url: url.clone() };

    match state.worker.on_fetch(&worker_request).await {
        FetchOutcome::Respond(response) => (response.status, response.headers, response.body).into_response(),
        FetchOutcome::Passthrough => match relay(&state, request, url).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        },
    }
}

/// Forward a passthrough request to the upstream unmodified.
async fn relay(state: &AppState, request: Request, url: Url) -> Result<Response, ServeError> {
    let method = request.method().clone();
    let headers = filter_headers(request.headers());

    let body = read_capped(request.into_body(), state.max_body_bytes).await?;

    let upstream_response = state
        .http
        .request(method, url.as_str())
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| ServeError::Upstream(e.to_string()))?;

    let status = upstream_response.status();
    let headers = filter_headers(upstream_response.headers());
    let body = upstream_response
        .bytes()
        .await
        .map_err(|e| ServeError::Upstream(e.to_string()))?;

    Ok((status, headers, Body::from(body)).into_response())
}

/// Buffer a body, bounded by the same cap as outbound fetches.
async fn read_capped(body: Body, cap: usize) -> Result<Bytes, ServeError> {
    to_bytes(body, cap)
        .await
        .map_err(|e| ServeError::Body(e.to_string()))
}

/// Drop hop-by-hop headers and the inbound Host.
///
/// Repeated headers are appended, not collapsed: passthrough responses
/// routinely carry several Set-Cookie values and every one must survive
/// the relay.
fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::new();
    for (name, value) in headers {
        if *name == header::HOST || HOP_BY_HOP.contains(&name.as_str()) {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}
