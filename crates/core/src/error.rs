//! Unified error types for shellproxy.

/// Unified error types for the shellproxy crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network-layer failure (connect error, timeout, aborted fetch).
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Upstream returned a response that could not be read.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Response body exceeds the configured byte cap.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Cache storage rejected an operation (per-entry quota exceeded).
    #[error("CACHE_ERROR: {0}")]
    CacheStorage(String),

    /// A required shell URL could not be pre-warmed during install.
    #[error("PREWARM_FAILED: {url}: {reason}")]
    PrewarmFailed { url: String, reason: String },
}
