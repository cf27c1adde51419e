//! Durable key-value storage port.
//!
//! The cache store is the only caller. Each key holds one JSON blob.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use stratagem_core::{Error, Result};

/// Durable key-value storage of string blobs.
pub trait DurableStorage: Send + Sync {
    /// Blob stored at `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob at `key`.
    ///
    /// # Errors
    ///
    /// [`Error::StorageWriteFailed`] when the backend refuses the write.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob at `key`. Removing an absent key is not an error.
    fn clear(&self, key: &str) -> Result<()>;
}

// ============================================================================
// In-memory
// ============================================================================

/// In-process storage with an optional total byte quota.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Unbounded storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes once the total stored bytes would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.lock().values().map(String::len).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.lock();
        if let Some(quota) = self.quota_bytes {
            let others: usize = blobs
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(Error::storage_write(
                    key,
                    format!("quota of {quota} bytes exceeded"),
                ));
            }
        }
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// File-backed
// ============================================================================

/// One `<key>.json` file per key under a directory.
///
/// Writes go to a temporary sibling that is then renamed over the target,
/// so a reader never sees a partially written blob.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`, created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl DurableStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage_read(key, e.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");
        let result = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(value.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &target));
        result.map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::storage_write(key, e.to_string())
        })
    }

    fn clear(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage_write(key, e.to_string())),
        }
    }
}
