//! Errors surfaced by the proxy front end.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures while relaying a passthrough request.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("invalid request target: {0}")]
    Target(String),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServeError::Target(_) => StatusCode::BAD_REQUEST,
            ServeError::Body(_) | ServeError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::error!(error = %self, "passthrough relay failed");
        (status, self.to_string()).into_response()
    }
}
