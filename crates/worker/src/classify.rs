//! URL classification for the fetch router.
//!
//! Every intercepted request maps to exactly one routing class, evaluated
//! in strict priority order. Ordering matters: a URL containing `/api/`
//! that also carries an asset extension is still API passthrough.

use reqwest::Method;
use url::Url;

/// File extensions treated as immutable, content-hashed build artifacts.
const ASSET_EXTENSIONS: [&str; 9] = ["js", "css", "png", "jpg", "jpeg", "svg", "ico", "woff", "woff2"];

/// The routing class of one intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Backend traffic; never intercepted.
    ApiPassthrough,
    /// Documents that must always reflect the latest deployed version.
    NoCacheDocument,
    /// Content-hashed build artifacts, safe to cache indefinitely.
    CacheableAsset,
    /// Anything else; treated as a navigation-like request.
    GenericNavigation,
}

impl std::fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingDecision::ApiPassthrough => write!(f, "api_passthrough"),
            RoutingDecision::NoCacheDocument => write!(f, "no_cache_document"),
            RoutingDecision::CacheableAsset => write!(f, "cacheable_asset"),
            RoutingDecision::GenericNavigation => write!(f, "generic_navigation"),
        }
    }
}

/// Maps (method, URL) to a `RoutingDecision`.
#[derive(Debug, Clone)]
pub struct Classifier {
    passthrough_hosts: Vec<String>,
}

impl Classifier {
    /// Create a classifier with the configured passthrough host fragments.
    pub fn new(passthrough_hosts: Vec<String>) -> Self {
        Self { passthrough_hosts }
    }

    /// Classify a request. First match wins:
    ///
    /// 1. ApiPassthrough: non-GET, non-http(s) scheme, `/api/` anywhere in
    ///    the URL, or authority matching a passthrough fragment
    /// 2. NoCacheDocument: `.html` path, `manifest.json`, `sw.js`, or the
    ///    root path
    /// 3. CacheableAsset: `/assets/`, `/static/`, or an asset extension
    /// 4. GenericNavigation: everything else
    pub fn classify(&self, method: &Method, url: &Url) -> RoutingDecision {
        if *method != Method::GET {
            return RoutingDecision::ApiPassthrough;
        }
        if !matches!(url.scheme(), "http" | "https") {
            return RoutingDecision::ApiPassthrough;
        }
        if url.as_str().contains("/api/") || self.matches_passthrough_host(url) {
            return RoutingDecision::ApiPassthrough;
        }

        let path = url.path();
        if path.ends_with(".html")
            || url.as_str().contains("manifest.json")
            || url.as_str().contains("sw.js")
            || path == "/"
        {
            return RoutingDecision::NoCacheDocument;
        }

        if path.contains("/assets/") || path.contains("/static/") || has_asset_extension(path) {
            return RoutingDecision::CacheableAsset;
        }

        RoutingDecision::GenericNavigation
    }

    fn matches_passthrough_host(&self, url: &Url) -> bool {
        let authority = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return false,
        };
        self.passthrough_hosts.iter().any(|fragment| authority.contains(fragment))
    }
}

fn has_asset_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ASSET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(vec!["onrender.com".into(), "localhost:3001".into()])
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_api_path_is_passthrough() {
        let decision = classifier().classify(&Method::GET, &url("https://app.example.com/api/bookings"));
        assert_eq!(decision, RoutingDecision::ApiPassthrough);
    }

    #[test]
    fn test_non_get_is_passthrough() {
        let decision = classifier().classify(&Method::POST, &url("https://app.example.com/index.html"));
        assert_eq!(decision, RoutingDecision::ApiPassthrough);
    }

    #[test]
    fn test_passthrough_host_fragment() {
        let c = classifier();
        assert_eq!(
            c.classify(&Method::GET, &url("https://backend.onrender.com/app.js")),
            RoutingDecision::ApiPassthrough
        );
        assert_eq!(
            c.classify(&Method::GET, &url("http://localhost:3001/health")),
            RoutingDecision::ApiPassthrough
        );
    }

    #[test]
    fn test_api_beats_asset_extension() {
        // Priority order: /api/ wins even with a cacheable extension.
        let decision = classifier().classify(&Method::GET, &url("https://app.example.com/api/export.png"));
        assert_eq!(decision, RoutingDecision::ApiPassthrough);
    }

    #[test]
    fn test_html_is_no_cache_document() {
        let decision = classifier().classify(&Method::GET, &url("https://app.example.com/index.html"));
        assert_eq!(decision, RoutingDecision::NoCacheDocument);
    }

    #[test]
    fn test_root_is_no_cache_document() {
        let decision = classifier().classify(&Method::GET, &url("https://app.example.com/"));
        assert_eq!(decision, RoutingDecision::NoCacheDocument);
    }

    #[test]
    fn test_manifest_and_worker_script_are_no_cache() {
        let c = classifier();
        assert_eq!(
            c.classify(&Method::GET, &url("https://app.example.com/manifest.json?v=20250112")),
            RoutingDecision::NoCacheDocument
        );
        assert_eq!(
            c.classify(&Method::GET, &url("https://app.example.com/sw.js")),
            RoutingDecision::NoCacheDocument
        );
    }

    #[test]
    fn test_nested_directory_is_not_root() {
        // Only the exact root path gets document treatment.
        let decision = classifier().classify(&Method::GET, &url("https://app.example.com/orders/"));
        assert_eq!(decision, RoutingDecision::GenericNavigation);
    }

    #[test]
    fn test_asset_directories() {
        let c = classifier();
        assert_eq!(
            c.classify(&Method::GET, &url("https://app.example.com/assets/chunk-abc123")),
            RoutingDecision::CacheableAsset
        );
        assert_eq!(
            c.classify(&Method::GET, &url("https://app.example.com/static/fonts/inter")),
            RoutingDecision::CacheableAsset
        );
    }

    #[test]
    fn test_asset_extensions() {
        let c = classifier();
        for ext in ASSET_EXTENSIONS {
            let u = url(&format!("https://app.example.com/media/file.{ext}"));
            assert_eq!(c.classify(&Method::GET, &u), RoutingDecision::CacheableAsset, "extension {ext}");
        }
    }

    #[test]
    fn test_icon_with_version_suffix_is_asset() {
        let decision = classifier().classify(&Method::GET, &url("https://app.example.com/icons/icon-192x192-20250112.png"));
        assert_eq!(decision, RoutingDecision::CacheableAsset);
    }

    #[test]
    fn test_unknown_path_is_generic_navigation() {
        let decision = classifier().classify(&Method::GET, &url("https://app.example.com/orders/42"));
        assert_eq!(decision, RoutingDecision::GenericNavigation);
    }

    #[test]
    fn test_extensionless_dotfile_is_not_asset() {
        assert!(!has_asset_extension("/.well-known"));
        assert!(!has_asset_extension("/readme"));
        assert!(has_asset_extension("/app.v2.min.js"));
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(RoutingDecision::CacheableAsset.to_string(), "cacheable_asset");
        assert_eq!(RoutingDecision::ApiPassthrough.to_string(), "api_passthrough");
    }
}
