//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHELLPROXY_*)
//! 2. TOML config file (if SHELLPROXY_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The loaded config is the single source of truth for cache namespace
//! names and the pre-warm manifest. Both versioned names must be bumped
//! together whenever the manifest or classification rules change, so stale
//! namespaces get purged on the next activation.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Icon sizes (px) included in the pre-warm manifest.
pub const ICON_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHELLPROXY_*)
/// 2. TOML config file (if SHELLPROXY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Name of the dynamic cache namespace.
    ///
    /// Set via SHELLPROXY_CACHE_NAME environment variable.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Name of the static shell cache namespace.
    ///
    /// Set via SHELLPROXY_STATIC_CACHE_NAME environment variable.
    #[serde(default = "default_static_cache_name")]
    pub static_cache_name: String,

    /// Origin of the fronted web application.
    ///
    /// Set via SHELLPROXY_UPSTREAM environment variable.
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Socket address the proxy listens on.
    ///
    /// Set via SHELLPROXY_LISTEN_ADDR environment variable.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Host substrings that force API passthrough (backend-hosting
    /// domains, local dev ports). Deployments where API traffic is also
    /// served from the product's own domain should list that domain
    /// fragment here as well; the defaults only cover the deployment
    /// platform and the local dev port.
    ///
    /// Set via SHELLPROXY_PASSTHROUGH_HOSTS environment variable.
    #[serde(default = "default_passthrough_hosts")]
    pub passthrough_hosts: Vec<String>,

    /// Version tag embedded in pre-warm manifest URLs.
    ///
    /// Set via SHELLPROXY_ASSET_VERSION environment variable.
    #[serde(default = "default_asset_version")]
    pub asset_version: String,

    /// Product name shown in push notifications.
    ///
    /// Set via SHELLPROXY_APP_NAME environment variable.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User-Agent string for upstream requests.
    ///
    /// Set via SHELLPROXY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    ///
    /// Set via SHELLPROXY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes read from an upstream response body.
    ///
    /// Set via SHELLPROXY_MAX_BODY_BYTES environment variable.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Per-entry byte quota for cache puts.
    ///
    /// Set via SHELLPROXY_CACHE_MAX_ENTRY_BYTES environment variable.
    #[serde(default = "default_cache_max_entry_bytes")]
    pub cache_max_entry_bytes: usize,
}

fn default_cache_name() -> String {
    "shellproxy-v1".into()
}

fn default_static_cache_name() -> String {
    "shellproxy-static-v1".into()
}

fn default_upstream() -> String {
    "http://localhost:3000".into()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_passthrough_hosts() -> Vec<String> {
    vec!["onrender.com".into(), "localhost:3001".into()]
}

fn default_asset_version() -> String {
    "20250112".into()
}

fn default_app_name() -> String {
    "Shellproxy".into()
}

fn default_user_agent() -> String {
    "shellproxy/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_body_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_cache_max_entry_bytes() -> usize {
    4_194_304 // 4MB
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            static_cache_name: default_static_cache_name(),
            upstream: default_upstream(),
            listen_addr: default_listen_addr(),
            passthrough_hosts: default_passthrough_hosts(),
            asset_version: default_asset_version(),
            app_name: default_app_name(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
            cache_max_entry_bytes: default_cache_max_entry_bytes(),
        }
    }
}

impl WorkerConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The pre-warm manifest: root page, versioned manifest file, and the
    /// icon set at the declared sizes, in order.
    pub fn shell_urls(&self) -> Vec<String> {
        let mut urls = Vec::with_capacity(2 + ICON_SIZES.len());
        urls.push("/".to_string());
        urls.push(format!("/manifest.json?v={}", self.asset_version));
        for size in ICON_SIZES {
            urls.push(format!("/icons/icon-{size}x{size}-{}.png", self.asset_version));
        }
        urls
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHELLPROXY_`
    /// 2. TOML file from `SHELLPROXY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELLPROXY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHELLPROXY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
