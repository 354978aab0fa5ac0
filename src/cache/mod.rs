//! Cache Module
//!
//! Provides one key-value cache contract over two stores: a transient
//! in-memory store and a durable file-backed store, both with TTL
//! expiration.

mod contract;
mod file;
mod memory;
mod record;
mod stats;


// Re-export public types
pub use contract::Cache;
pub use file::FileCache;
pub use memory::MemoryCache;
pub use record::{CacheRecord, Ttl};
pub use stats::CacheStats;
