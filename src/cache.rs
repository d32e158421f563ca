//! On-disk badge cache.
//!
//! Cached badges live flat under `<source_dir>/_cache/shields_io/`, one file
//! per canonical query, named by the MD5 of the query plus `.svg`. Entries
//! are immutable once written and never expire; the only way content
//! changes is a different query producing a different file name.
//!
//! Writes are atomic (temp file in the same directory, synced, then renamed
//! into place), so concurrent resolutions of the same badge can race
//! freely: readers never observe a partial entry and the last writer wins
//! with identical bytes.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::constants::CACHE_SUBDIR;
use crate::error::ShieldError;

/// Aggregate numbers for `cache info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached badge files.
    pub entries: usize,
    /// Total payload size in bytes.
    pub total_bytes: u64,
}

/// Content-addressed store for badge payloads.
#[derive(Debug, Clone)]
pub struct ShieldStore {
    root: PathBuf,
}

impl ShieldStore {
    /// Create a store rooted under the given site source directory.
    ///
    /// The source directory is resolved to an absolute path immediately, so
    /// later working-directory changes cannot move the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if the path cannot be resolved
    /// against the working directory.
    pub fn new(source_dir: impl AsRef<Path>) -> Result<Self, ShieldError> {
        let source_dir = source_dir.as_ref();
        let absolute = std::path::absolute(source_dir)
            .map_err(|e| storage_error("resolve", source_dir, e))?;
        Ok(Self {
            root: absolute.join(CACHE_SUBDIR),
        })
    }

    /// The cache directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path a given entry name maps to.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether an entry is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Create the cache directory (and parents) if absent.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if creation fails.
    pub async fn ensure_root(&self) -> Result<(), ShieldError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| storage_error("create cache dir", &self.root, e))
    }

    /// Read an entry's payload.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if the entry is missing or
    /// unreadable.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, ShieldError> {
        let path = self.path_for(name);
        fs::read(&path).await.map_err(|e| storage_error("read", &path, e))
    }

    /// Write an entry atomically.
    ///
    /// The payload goes to a `.tmp` sibling first, is synced to disk, and
    /// is then renamed over the final name, so no reader can observe a
    /// partially written entry.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if any step fails.
    pub async fn write(&self, name: &str, payload: &[u8]) -> Result<(), ShieldError> {
        self.ensure_root().await?;

        let target = self.path_for(name);
        let temp = target.with_extension("tmp");

        let mut file =
            fs::File::create(&temp).await.map_err(|e| storage_error("create", &temp, e))?;
        file.write_all(payload).await.map_err(|e| storage_error("write", &temp, e))?;
        file.sync_all().await.map_err(|e| storage_error("sync", &temp, e))?;
        drop(file);

        fs::rename(&temp, &target).await.map_err(|e| storage_error("rename", &target, e))?;

        debug!(entry = name, bytes = payload.len(), "cached shield payload");
        Ok(())
    }

    /// Count entries and total bytes. A missing cache directory is an
    /// empty cache, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if the directory exists but cannot
    /// be listed.
    pub async fn stats(&self) -> Result<CacheStats, ShieldError> {
        let mut stats = CacheStats::default();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(storage_error("list", &self.root, e)),
        };

        while let Some(entry) =
            entries.next_entry().await.map_err(|e| storage_error("list", &self.root, e))?
        {
            let metadata =
                entry.metadata().await.map_err(|e| storage_error("stat", &entry.path(), e))?;
            if metadata.is_file() {
                stats.entries += 1;
                stats.total_bytes += metadata.len();
            }
        }
        Ok(stats)
    }

    /// Delete every entry, reporting how many were removed. The cache
    /// directory itself is kept. A missing directory removes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if listing or deletion fails.
    pub async fn clear(&self) -> Result<usize, ShieldError> {
        let mut removed = 0;
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(storage_error("list", &self.root, e)),
        };

        while let Some(entry) =
            entries.next_entry().await.map_err(|e| storage_error("list", &self.root, e))?
        {
            let path = entry.path();
            if path.is_file() {
                fs::remove_file(&path).await.map_err(|e| storage_error("remove", &path, e))?;
                removed += 1;
            }
        }

        debug!(removed, "cleared shield cache");
        Ok(removed)
    }
}

fn storage_error(operation: &'static str, path: &Path, source: std::io::Error) -> ShieldError {
    ShieldError::Storage {
        operation,
        path: path.to_path_buf(),
        source,
    }
}
