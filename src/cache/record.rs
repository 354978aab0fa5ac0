//! Cache Record Module
//!
//! Defines the unit of storage shared by both stores: a cached value plus
//! its TTL metadata, and the `Ttl` type that normalizes requested lifetimes
//! to whole seconds.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Ttl ==
/// Requested lifetime for a record, normalized to whole seconds.
///
/// Accepts plain seconds, a [`std::time::Duration`] (sub-second precision
/// truncates), or a [`chrono::Duration`] (negative intervals clamp to zero).
/// A zero TTL yields a record that is expired from the first read onward;
/// only the absence of a TTL (`None` at the call site) means no expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl(u64);

impl Ttl {
    /// Creates a TTL of the given number of seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the lifetime as whole seconds.
    pub const fn as_secs(self) -> u64 {
        self.0
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs())
    }
}

impl From<chrono::Duration> for Ttl {
    fn from(interval: chrono::Duration) -> Self {
        Self(interval.num_seconds().max(0) as u64)
    }
}

// == Cache Record ==
/// A single cached value with its expiry metadata.
///
/// Field names match the on-disk representation used by the file store:
/// `created`, `key`, `value`, `ttl`, `expires`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// The cache key, stored redundantly for diagnostics
    pub key: String,
    /// The stored value
    pub value: Value,
    /// Requested lifetime in seconds, None = no expiration requested
    pub ttl: Option<u64>,
    /// Expiration timestamp, None = never expires
    pub expires: Option<DateTime<Utc>>,
}

impl CacheRecord {
    // == Constructor ==
    /// Creates a new cache record with optional TTL.
    ///
    /// The expiration time is `created + ttl`. A TTL too large to represent
    /// as a timestamp offset leaves `expires` unset, so such records never
    /// expire.
    ///
    /// # Arguments
    /// * `key` - The key the record is stored under
    /// * `value` - The value to store
    /// * `ttl` - Optional lifetime
    pub fn new(key: &str, value: Value, ttl: Option<Ttl>) -> Self {
        let created = Utc::now();
        let ttl = ttl.map(Ttl::as_secs);
        let expires = ttl.and_then(|secs| expires_after(created, secs));

        Self {
            created,
            key: key.to_string(),
            value,
            ttl,
            expires,
        }
    }

    // == Is Expired ==
    /// Checks if the record has expired.
    ///
    /// Boundary condition: a record is considered expired when the current
    /// time is greater than or equal to the expiration time. A zero TTL
    /// therefore produces a record that is already expired when read.
    ///
    /// # Returns
    /// - `true` if the record has an expiration time that has been reached
    /// - `false` if the record never expires or its TTL hasn't elapsed
    pub fn is_expired(&self) -> bool {
        match self.expires {
            Some(expires) => Utc::now() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in whole seconds, or None if no expiration is set.
    ///
    /// This method is useful for debugging and statistics purposes.
    ///
    /// # Returns
    /// - `Some(0)` if the record has expired (TTL elapsed)
    /// - `Some(remaining_seconds)` if the record has TTL and hasn't expired
    /// - `None` if the record has no TTL (never expires)
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.expires.map(|expires| {
            let remaining = (expires - Utc::now()).num_seconds();
            remaining.max(0) as u64
        })
    }
}

// == Utility Functions ==
/// Computes `created + ttl_secs`, or None when the offset is unrepresentable.
fn expires_after(created: DateTime<Utc>, ttl_secs: u64) -> Option<DateTime<Utc>> {
    let delta = i64::try_from(ttl_secs).ok().and_then(TimeDelta::try_seconds)?;
    created.checked_add_signed(delta)
}
