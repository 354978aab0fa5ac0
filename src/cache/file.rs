//! File Cache Module
//!
//! The durable store: one JSON record file per key under a root directory,
//! with hash-derived fan-out paths, shared/exclusive file locking, and TTL
//! expiration on the read path.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::cache::contract::validate_key;
use crate::cache::{Cache, CacheRecord, CacheStats, Ttl};
use crate::config::FileCacheConfig;
use crate::error::{CacheError, Result};

/// Extension given to record files.
const RECORD_EXT: &str = "json";

// == File Cache ==
/// File-backed cache store.
///
/// Each key maps deterministically to
/// `<root>/<first two hex chars of sha1(key)>/<remaining hex chars>.json`,
/// so lookups never need an index and records spread across at most 256
/// subdirectories. Writers hold an exclusive lock on the record file for the
/// duration of the write and readers hold a shared lock, which keeps
/// concurrent processes from observing partial records. Locks are per file:
/// operations on different keys never contend.
///
/// Construction performs no I/O. Directories appear on first write, and a
/// store pointed at a directory that doesn't exist yet simply misses on
/// every read.
#[derive(Debug)]
pub struct FileCache {
    /// Root directory holding the shard subdirectories
    root: PathBuf,
    /// Mode for directories the store creates (no effect off Unix)
    dir_mode: u32,
    /// Performance statistics
    stats: CacheStats,
}

impl Default for FileCache {
    fn default() -> Self {
        Self::with_config(FileCacheConfig::default())
    }
}

impl FileCache {
    // == Constructors ==
    /// Creates a store rooted at `root` with default directory permissions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(FileCacheConfig {
            root: root.into(),
            ..FileCacheConfig::default()
        })
    }

    /// Creates a store from an explicit configuration.
    pub fn with_config(config: FileCacheConfig) -> Self {
        Self {
            root: config.root,
            dir_mode: config.dir_mode,
            stats: CacheStats::new(),
        }
    }

    /// Returns the root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Path Derivation ==
    /// Computes the record path for a key.
    ///
    /// The first two hex characters of the key's SHA-1 digest name the shard
    /// directory and the remaining 38 name the file. The same key always
    /// resolves to the same path, across instances and processes.
    pub fn record_path(&self, key: &str) -> PathBuf {
        let digest = hex::encode(Sha1::digest(key.as_bytes()));
        self.root
            .join(&digest[..2])
            .join(format!("{}.{}", &digest[2..], RECORD_EXT))
    }

    // == Cleanup Expired ==
    /// Walks the shard directories and removes expired record files.
    ///
    /// Returns the number of records removed. Records that cannot be parsed
    /// are logged and left in place rather than failing the sweep. The read
    /// path already removes expired records as it encounters them; this
    /// sweep reclaims disk held by records nobody asks for anymore.
    pub fn cleanup_expired(&mut self) -> Result<usize> {
        let mut removed = 0;
        let mut live = 0;

        for shard in self.shard_dirs()? {
            let entries =
                fs::read_dir(&shard).map_err(|e| CacheError::storage(&shard, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| CacheError::storage(&shard, e))?;
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                match self.read_record(&path) {
                    Ok(Some(record)) if record.is_expired() => {
                        self.remove_record(&path)?;
                        self.stats.record_expiration();
                        removed += 1;
                    }
                    Ok(Some(_)) => live += 1,
                    // Deleted by someone else mid-sweep
                    Ok(None) => {}
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable record during sweep");
                    }
                }
            }
        }

        self.stats.set_total_entries(live);
        if removed > 0 {
            debug!(removed, "Swept expired records from file store");
        }
        Ok(removed)
    }

    // == Stats ==
    /// Returns current cache statistics.
    ///
    /// `total_entries` reflects the live records counted by the most recent
    /// [`cleanup_expired`](FileCache::cleanup_expired) sweep; between sweeps
    /// the filesystem is the source of truth.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Filesystem Helpers ==
    /// Creates a directory and its parents, tolerating concurrent creation.
    fn create_dir(&self, path: &Path) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.dir_mode);
        }
        builder.create(path).map_err(|e| CacheError::storage(path, e))
    }

    /// Reads and parses the record at `path` under a shared lock.
    ///
    /// Returns `Ok(None)` when the file does not exist, which is the
    /// ordinary miss.
    fn read_record(&self, path: &Path) -> Result<Option<CacheRecord>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::storage(path, e)),
        };
        file.lock_shared().map_err(|e| CacheError::storage(path, e))?;
        let record = serde_json::from_reader(BufReader::new(&file))?;
        Ok(Some(record))
    }

    /// Serializes and writes a record to `path` under an exclusive lock.
    fn write_record(&self, path: &Path, record: &CacheRecord) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir(parent)?;
        }
        let payload = serde_json::to_vec(record)?;

        // Open without truncating: the file may only shrink once the
        // exclusive lock is held, or a concurrent reader could observe an
        // empty record.
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(path)
            .map_err(|e| CacheError::storage(path, e))?;
        file.lock().map_err(|e| CacheError::storage(path, e))?;
        file.set_len(0).map_err(|e| CacheError::storage(path, e))?;
        file.write_all(&payload)
            .map_err(|e| CacheError::storage(path, e))?;
        Ok(())
    }

    /// Removes the file at `path`, treating an already-gone file as success.
    fn remove_record(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::storage(path, e)),
        }
    }

    /// Lists the shard subdirectories currently under the root.
    fn shard_dirs(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::storage(&self.root, e)),
        };

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::storage(&self.root, e))?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        Ok(dirs)
    }
}

impl Cache for FileCache {
    fn set(&mut self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<()> {
        validate_key(key)?;

        let path = self.record_path(key);
        let record = CacheRecord::new(key, value, ttl);
        self.write_record(&path, &record)?;
        debug!(key = %key, path = %path.display(), "Record written");
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;

        let path = self.record_path(key);
        match self.read_record(&path)? {
            Some(record) if record.is_expired() => {
                self.remove_record(&path)?;
                self.stats.record_expiration();
                self.stats.record_miss();
                debug!(key = %key, "Expired record removed on read");
                Ok(None)
            }
            Some(record) => {
                self.stats.record_hit();
                // An explicit null payload reads back as a miss
                match record.value {
                    Value::Null => Ok(None),
                    value => Ok(Some(value)),
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

        let path = self.record_path(key);
        match self.read_record(&path)? {
            Some(record) if record.is_expired() => {
                self.remove_record(&path)?;
                self.stats.record_expiration();
                self.stats.record_miss();
                debug!(key = %key, "Expired record removed on read");
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

        self.remove_record(&self.record_path(key))
    }

    fn clear(&mut self) -> Result<()> {
        // Remove the children, keep the root itself
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(CacheError::storage(&self.root, e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| CacheError::storage(&self.root, e))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| CacheError::storage(&path, e))?;
            if file_type.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| CacheError::storage(&path, e))?;
            } else {
                fs::remove_file(&path).map_err(|e| CacheError::storage(&path, e))?;
            }
        }

        self.stats.set_total_entries(0);
        Ok(())
    }
}
