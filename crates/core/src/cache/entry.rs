//! Cached response entries.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// A stored (request-key -> response) pair's value half.
///
/// Created when a static asset fetch succeeds with HTTP 200 or during
/// install pre-warm; never updated in place (a re-fetch overwrites the
/// whole entry); destroyed only when its owning namespace is purged.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// HTTP status code of the stored response.
    pub status: u16,
    /// Response headers as (name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Bytes,
    /// When the entry was stored.
    pub stored_at: DateTime<Utc>,
}

impl CachedEntry {
    /// Build an entry stamped with the current time.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self { status, headers, body, stored_at: Utc::now() }
    }

    /// Size of the body in bytes, used for the per-entry quota check.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_new_stamps_time() {
        let before = Utc::now();
        let entry = CachedEntry::new(200, vec![("content-type".into(), "text/css".into())], Bytes::from("body {}"));
        assert!(entry.stored_at >= before);
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_len(), 7);
    }
}
