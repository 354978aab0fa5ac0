//! Configuration Module
//!
//! Construction-time settings for the file-backed store.

use std::env;
use std::path::PathBuf;

/// Directory mode applied to created cache directories (Unix only).
pub const DEFAULT_DIR_MODE: u32 = 0o775;

/// File store configuration parameters.
///
/// The defaults put the cache under the platform temp directory, so a store
/// works out of the box without any setup.
#[derive(Debug, Clone)]
pub struct FileCacheConfig {
    /// Root directory that holds the record files
    pub root: PathBuf,
    /// Mode for directories the store creates (no effect off Unix)
    pub dir_mode: u32,
}

impl FileCacheConfig {
    /// Creates a new FileCacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ROOT` - Root directory for record files (default: `<temp dir>/cache`)
    pub fn from_env() -> Self {
        Self {
            root: env::var_os("CACHE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(default_root),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

/// The platform temp directory plus a `cache` component.
fn default_root() -> PathBuf {
    env::temp_dir().join("cache")
}
