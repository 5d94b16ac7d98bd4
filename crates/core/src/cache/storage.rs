//! Named cache namespaces behind a shared in-memory store.
//!
//! Uses a HashMap with tokio RwLock for concurrent access. Reads clone
//! entries out so no lock is held while a response is being served.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::Error;
use crate::cache::CachedEntry;

/// A single named key-value store of (request-key, response) pairs.
pub struct CacheNamespace {
    name: String,
    max_entry_bytes: usize,
    entries: RwLock<HashMap<String, CachedEntry>>,
}

impl CacheNamespace {
    fn new(name: String, max_entry_bytes: usize) -> Self {
        Self { name, max_entry_bytes, entries: RwLock::new(HashMap::new()) }
    }

    /// Namespace name, including its version suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an entry by exact request key.
    pub async fn get(&self, key: &str) -> Option<CachedEntry> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store an entry, overwriting any previous value wholesale.
    ///
    /// # Errors
    ///
    /// Returns `Error::CacheStorage` if the entry body exceeds the
    /// per-entry quota. Callers treat this as best-effort and carry on.
    pub async fn put(&self, key: &str, entry: CachedEntry) -> Result<(), Error> {
        if entry.body_len() > self.max_entry_bytes {
            return Err(Error::CacheStorage(format!(
                "entry for {} is {} bytes, exceeds quota of {}",
                key,
                entry.body_len(),
                self.max_entry_bytes
            )));
        }

        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the namespace holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// The set of all cache namespaces, keyed by name.
///
/// Clones share the underlying store, mirroring how every service worker
/// invocation sees the same browser cache storage.
#[derive(Clone)]
pub struct CacheStorage {
    namespaces: Arc<RwLock<HashMap<String, Arc<CacheNamespace>>>>,
    max_entry_bytes: usize,
}

impl CacheStorage {
    /// Create an empty store with the given per-entry byte quota.
    pub fn new(max_entry_bytes: usize) -> Self {
        Self { namespaces: Arc::new(RwLock::new(HashMap::new())), max_entry_bytes }
    }

    /// Open a namespace, creating it if absent.
    pub async fn open(&self, name: &str) -> Arc<CacheNamespace> {
        {
            let namespaces = self.namespaces.read().await;
            if let Some(ns) = namespaces.get(name) {
                return Arc::clone(ns);
            }
        }

        let mut namespaces = self.namespaces.write().await;
        Arc::clone(
            namespaces
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(CacheNamespace::new(name.to_string(), self.max_entry_bytes))),
        )
    }

    /// Names of all existing namespaces.
    pub async fn keys(&self) -> Vec<String> {
        self.namespaces.read().await.keys().cloned().collect()
    }

    /// Delete a namespace and every entry it holds.
    ///
    /// Returns true if the namespace existed.
    pub async fn delete(&self, name: &str) -> bool {
        self.namespaces.write().await.remove(name).is_some()
    }
}
