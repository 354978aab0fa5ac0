//! Cache Contract Module
//!
//! The operation set shared by every store, plus key validation. Stores
//! implement the five single-key primitives; the multi-key operations and
//! the default-value helpers are provided on top of them.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::Ttl;
use crate::error::{CacheError, Result};

// == Key Validation ==
/// Checks that a key is usable before any storage is touched.
///
/// Keys must be non-empty; beyond that any UTF-8 string is accepted since
/// the file store derives filesystem paths from a hash of the key, never
/// from the key itself.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

// == Cache Trait ==
/// Uniform contract over the cache stores.
///
/// All operations take `&mut self`: reads are allowed to mutate because
/// looking up an expired record removes it on the spot. Expiration is
/// checked only on this read path; nothing runs in the background. A missing
/// or expired key is an ordinary outcome (`None`/`false`), never an error.
///
/// Stores assume a single writer at a time, which the exclusive receiver
/// enforces at compile time. Sharing one store across threads means wrapping
/// it in a `Mutex` (the file store additionally locks each record file, so
/// separate store instances over the same directory stay consistent).
pub trait Cache {
    /// Stores a value under a key, replacing any previous record.
    ///
    /// With `ttl` of `None` the record never expires. A zero TTL is honored
    /// literally: the record is expired from the first read onward.
    fn set(&mut self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<()>;

    /// Retrieves the value stored under a key.
    ///
    /// Returns `None` when the key is missing, expired (the record is
    /// removed before returning), or holds an explicit JSON `null`.
    fn get(&mut self, key: &str) -> Result<Option<Value>>;

    /// Checks whether a key currently holds a live record.
    ///
    /// Like [`get`](Cache::get), an expired record found here is removed.
    /// A record holding JSON `null` still counts as present while live.
    fn has(&mut self, key: &str) -> Result<bool>;

    /// Removes the record stored under a key.
    ///
    /// Deleting a key that does not exist is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Removes every record in the store.
    fn clear(&mut self) -> Result<()>;

    /// Retrieves the values for a batch of keys.
    ///
    /// Every requested key appears in the result; misses map to `None`.
    /// The first failing lookup aborts the batch.
    fn get_multiple(&mut self, keys: &[&str]) -> Result<HashMap<String, Option<Value>>> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            values.insert((*key).to_string(), self.get(key)?);
        }
        Ok(values)
    }

    /// Stores a batch of key-value pairs under one shared TTL.
    ///
    /// Pairs are written in order; the first failing write aborts the batch
    /// and leaves earlier writes in place.
    fn set_multiple(&mut self, pairs: &[(&str, Value)], ttl: Option<Ttl>) -> Result<()> {
        for (key, value) in pairs {
            self.set(key, value.clone(), ttl)?;
        }
        Ok(())
    }

    /// Removes the records for a batch of keys.
    fn delete_multiple(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }

    /// Retrieves a value, falling back to `default` on a miss.
    fn get_or(&mut self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Retrieves a batch of values, filling misses with `default`.
    fn get_multiple_or(&mut self, keys: &[&str], default: Value) -> Result<HashMap<String, Value>> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            let value = self.get(key)?.unwrap_or_else(|| default.clone());
            values.insert((*key).to_string(), value);
        }
        Ok(values)
    }
}
