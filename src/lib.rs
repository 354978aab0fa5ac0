//! Simple Cache - A lightweight TTL key-value cache
//!
//! Provides one cache contract over interchangeable stores: transient
//! in-memory and durable file-backed.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheRecord, CacheStats, FileCache, MemoryCache, Ttl};
pub use config::FileCacheConfig;
pub use error::{CacheError, Result};
