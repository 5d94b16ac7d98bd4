//! Configuration validation rules.
//!
//! This module provides validation logic for `WorkerConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::WorkerConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl WorkerConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - either cache name is empty, or both names are equal
    /// - `upstream` is not an http(s) URL
    /// - `listen_addr` is not a valid socket address
    /// - `timeout_ms` is outside [100ms, 5 minutes]
    /// - `max_body_bytes` or `cache_max_entry_bytes` is 0
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_name.is_empty() {
            return Err(ConfigError::Invalid { field: "cache_name".into(), reason: "must not be empty".into() });
        }
        if self.static_cache_name.is_empty() {
            return Err(ConfigError::Invalid { field: "static_cache_name".into(), reason: "must not be empty".into() });
        }
        if self.cache_name == self.static_cache_name {
            return Err(ConfigError::Invalid {
                field: "static_cache_name".into(),
                reason: "must differ from cache_name".into(),
            });
        }

        match url::Url::parse(&self.upstream) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::Invalid {
                    field: "upstream".into(),
                    reason: format!("unsupported scheme: {}", parsed.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "upstream".into(), reason: e.to_string() });
            }
        }

        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "listen_addr".into(),
                reason: "must be a host:port socket address".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_body_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.cache_max_entry_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_entry_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cache_max_entry_bytes > self.max_body_bytes {
            tracing::warn!(
                cache_max_entry_bytes = self.cache_max_entry_bytes,
                max_body_bytes = self.max_body_bytes,
                "cache_max_entry_bytes exceeds max_body_bytes; \
                 entries above the fetch cap can never be stored"
            );
        }

        Ok(())
    }
}
