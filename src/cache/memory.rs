//! Memory Cache Module
//!
//! The transient store: HashMap storage with TTL expiration and no
//! persistence. Contents last at most as long as the process.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::contract::validate_key;
use crate::cache::{Cache, CacheRecord, CacheStats, Ttl};
use crate::error::Result;

// == Memory Cache ==
/// In-memory cache store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    /// Key-value storage
    entries: HashMap<String, CacheRecord>,
    /// Performance statistics
    stats: CacheStats,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a new empty MemoryCache.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired records from the store.
    ///
    /// Returns the number of records removed. The read path already removes
    /// expired records as it encounters them; this sweep only reclaims
    /// memory held by records nobody asks for anymore.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, record)| record.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        if count > 0 {
            debug!(removed = count, "Swept expired records from memory store");
        }
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of records, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes an expired record found on the read path.
    fn expire(&mut self, key: &str) {
        self.entries.remove(key);
        self.stats.record_expiration();
        self.stats.record_miss();
        self.stats.set_total_entries(self.entries.len());
        debug!(key = %key, "Expired record removed on read");
    }
}

impl Cache for MemoryCache {
    fn set(&mut self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<()> {
        validate_key(key)?;

        let record = CacheRecord::new(key, value, ttl);
        self.entries.insert(key.to_string(), record);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;

        match self.entries.get(key) {
            Some(record) if record.is_expired() => {
                self.expire(key);
                Ok(None)
            }
            Some(record) => {
                self.stats.record_hit();
                // An explicit null payload reads back as a miss
                match &record.value {
                    Value::Null => Ok(None),
                    value => Ok(Some(value.clone())),
                }
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    fn has(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;

        match self.entries.get(key) {
            Some(record) if record.is_expired() => {
                self.expire(key);
                Ok(false)
            }
            Some(_) => {
                self.stats.record_hit();
                Ok(true)
            }
            None => {
                self.stats.record_miss();
                Ok(false)
            }
        }
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;

        self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.stats.set_total_entries(0);
        Ok(())
    }
}
