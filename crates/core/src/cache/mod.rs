//! In-memory cache storage modeled on the browser Cache Storage API.
//!
//! Two logical namespaces exist at any time: a versioned "static shell"
//! store and a versioned general store. Namespaces are append/overwrite-
//! by-key and delete-by-namespace only; there are no cross-key
//! transactions. All operations are safe for concurrent callers.

pub mod entry;
pub mod storage;

pub use entry::CachedEntry;
pub use storage::{CacheNamespace, CacheStorage};
