// Filesystem cache backend.
// One JSON file per fingerprint, written atomically through a temp file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::warn;

use crate::ckan::ApiResponse;
use crate::error::{CkanError, Result};

use super::paths::{cache_dir, entry_path};
use super::store::{CacheEntry, CacheStore};

/// Cache that persists entries under a directory, surviving process restarts.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Use the platform cache directory.
    pub fn new() -> Result<Self> {
        let dir = cache_dir().ok_or_else(|| {
            CkanError::Config("could not determine a cache directory".to_string())
        })?;
        Ok(Self::with_dir(dir))
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the raw entry for a key, expired or not.
    pub fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = entry_path(&self.dir, key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let entry: CacheEntry = serde_json::from_str(&contents)?;
        Ok(Some(entry))
    }

    /// Write an entry as pretty JSON.
    pub fn write_entry(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = entry_path(&self.dir, key);
        let json = serde_json::to_string_pretty(entry)?;

        // Each writer gets its own temp file; the last rename wins.
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| CkanError::Io(e.error))?;

        Ok(())
    }

    /// Delete the cache directory and all contents.
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Result<Option<ApiResponse>> {
        match self.read_entry(key) {
            Ok(entry) => Ok(entry.and_then(CacheEntry::into_fresh)),
            // A corrupt entry is a miss; the next fetch overwrites it.
            Err(CkanError::Json(e)) => {
                warn!(key, error = %e, "discarding unreadable cache entry");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &ApiResponse, ttl: Duration) -> Result<()> {
        self.write_entry(key, &CacheEntry::new(value.clone(), ttl))
    }
}
