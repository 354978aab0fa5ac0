//! Error types for the cache stores
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache stores.
///
/// A missing or expired key is not an error; read operations report those
/// as `None`/`false`. This type covers the failures that actually abort an
/// operation: bad keys, filesystem trouble, and unreadable records.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key failed validation
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Filesystem operation failed
    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Record could not be encoded or decoded
    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Wraps an I/O error together with the path it occurred on.
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache stores.
pub type Result<T> = std::result::Result<T, CacheError>;
