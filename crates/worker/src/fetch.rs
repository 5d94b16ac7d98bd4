//! Network transport for the fetch router.
//!
//! The `Network` trait is the seam between routing policy and the wire:
//! the router only ever talks to a `Network`, so tests can substitute a
//! mock transport with call counters. `HttpNetwork` is the real
//! implementation over reqwest.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, StatusCode, header};
use std::time::Instant;
use url::Url;

use shellproxy_core::{CachedEntry, Error, WorkerConfig};

/// How the network fetch should interact with intermediary caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain fetch; intermediaries may serve from their own caches.
    Default,
    /// Cache-busting fetch with explicit no-cache directives.
    NoCache,
}

/// An intercepted request, reduced to what routing needs.
#[derive(Debug, Clone)]
pub struct WorkerRequest {
    pub method: Method,
    pub url: Url,
}

impl WorkerRequest {
    /// Convenience constructor for a GET request.
    pub fn get(url: Url) -> Self {
        Self { method: Method::GET, url }
    }
}

/// A response the router can hand back to the host runtime.
#[derive(Debug, Clone)]
pub struct WorkerResponse {
    pub status: StatusCode,
    pub headers: header::HeaderMap,
    pub body: Bytes,
}

impl WorkerResponse {
    /// Synthesize the offline fallback response.
    pub fn offline(body: &'static str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            headers: header::HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    /// Copy this response into a cache entry.
    ///
    /// This is the store-before-return half of the clone-then-return
    /// contract: the entry is built from a borrow, the response itself is
    /// returned to the caller untouched.
    pub fn to_entry(&self) -> CachedEntry {
        let headers = self
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        CachedEntry::new(self.status.as_u16(), headers, self.body.clone())
    }

    /// Rebuild a response from a cache entry.
    pub fn from_entry(entry: &CachedEntry) -> Self {
        let mut headers = header::HeaderMap::new();
        for (name, value) in &entry.headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::from_bytes(name.as_bytes()),
                header::HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        Self {
            status: StatusCode::from_u16(entry.status).unwrap_or(StatusCode::OK),
            headers,
            body: entry.body.clone(),
        }
    }
}

/// Cache key for a request URL: path plus query, origin-independent.
pub fn cache_key(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// Transport abstraction consumed by the router and lifecycle manager.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetch a URL, returning status, headers and body bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Network` for connect errors, timeouts and aborted
    /// fetches; `Error::FetchTooLarge` when the body exceeds the cap.
    async fn fetch(&self, request: &WorkerRequest, mode: FetchMode) -> Result<WorkerResponse, Error>;
}

/// reqwest-backed `Network` implementation.
pub struct HttpNetwork {
    http: Client,
    max_body_bytes: usize,
}

impl HttpNetwork {
    /// Build the HTTP client from configuration.
    pub fn new(config: &WorkerConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, max_body_bytes: config.max_body_bytes })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &WorkerRequest, mode: FetchMode) -> Result<WorkerResponse, Error> {
        let start = Instant::now();

        let mut req = self.http.request(request.method.clone(), request.url.as_str());
        if mode == FetchMode::NoCache {
            req = req
                .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
                .header(header::PRAGMA, "no-cache");
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Network(format!("network error: {e}")))?;

        let status = response.status();
        let headers = response.headers().clone();

        if let Some(len) = response.content_length()
            && len as usize > self.max_body_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.max_body_bytes)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {e}")))?;

        if body.len() > self.max_body_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", body.len(), self.max_body_bytes)));
        }

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            request.url,
            status,
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(WorkerResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_path_only() {
        let url = Url::parse("https://app.example.com/assets/app.js").unwrap();
        assert_eq!(cache_key(&url), "/assets/app.js");
    }

    #[test]
    fn test_cache_key_keeps_query() {
        let url = Url::parse("https://app.example.com/manifest.json?v=20250112").unwrap();
        assert_eq!(cache_key(&url), "/manifest.json?v=20250112");
    }

    #[test]
    fn test_cache_key_ignores_origin() {
        let a = Url::parse("https://app.example.com/").unwrap();
        let b = Url::parse("http://localhost:3000/").unwrap();
        assert_eq!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn test_offline_response() {
        let response = WorkerResponse::offline("Asset not available offline");
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.body, Bytes::from_static(b"Asset not available offline"));
    }

    #[test]
    fn test_entry_round_trip_preserves_status_and_headers() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("image/png"));
        let response = WorkerResponse { status: StatusCode::OK, headers, body: Bytes::from_static(b"png") };

        let rebuilt = WorkerResponse::from_entry(&response.to_entry());
        assert_eq!(rebuilt.status, StatusCode::OK);
        assert_eq!(rebuilt.headers.get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(rebuilt.body, response.body);
    }

    #[tokio::test]
    async fn test_http_network_new() {
        let config = WorkerConfig::default();
        assert!(HttpNetwork::new(&config).is_ok());
    }
}
