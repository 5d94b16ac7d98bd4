//! Core types and shared functionality for shellproxy.
//!
//! This crate provides:
//! - In-memory cache storage (namespaces and entries)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheNamespace, CacheStorage, CachedEntry};
pub use config::WorkerConfig;
pub use error::Error;
