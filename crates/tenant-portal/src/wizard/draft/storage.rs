use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const DRAFT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Local keyed text storage the draft codec writes through.
pub trait DraftStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage io failure at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Shared in-process map. Clones see the same entries, which is how a page reload is
/// simulated: mount a second controller on a clone of the first one's storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryDraftStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("draft storage lock poisoned".to_string()))
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(self.quota_bytes, value)?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileDraftStorage {
    root: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileDraftStorage {
    pub fn new(root: impl Into<PathBuf>, quota_bytes: Option<usize>) -> Self {
        Self {
            root: root.into(),
            quota_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", canonical_key(key), DRAFT_EXTENSION))
    }
}

impl DraftStorage for FileDraftStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(self.quota_bytes, value)?;
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_for(key);
        write_atomic(&path, value).map_err(|source| StorageError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

fn check_quota(quota_bytes: Option<usize>, value: &str) -> Result<(), StorageError> {
    match quota_bytes {
        Some(quota) if value.len() > quota => Err(StorageError::QuotaExceeded {
            needed: value.len(),
            quota,
        }),
        _ => Ok(()),
    }
}

fn canonical_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    let tmp = path.with_extension(TMP_SUFFIX);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn memory_clones_share_entries() {
        let storage = MemoryDraftStorage::new();
        let reloaded = storage.clone();
        storage.set("draft", "{}").expect("write succeeds");
        assert_eq!(reloaded.get("draft").expect("read"), Some("{}".to_string()));
        reloaded.remove("draft").expect("remove");
        reloaded.remove("draft").expect("removing twice is fine");
        assert!(!storage.contains("draft"));
    }

    #[test]
    fn memory_quota_rejects_large_values() {
        let storage = MemoryDraftStorage::with_quota(4);
        let err = storage.set("draft", "too long").expect_err("over quota");
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 8,
                quota: 4
            }
        ));
        assert!(!storage.contains("draft"));
    }

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = tempfile::tempdir().expect("scratch dir");
        let storage = FileDraftStorage::new(dir.path().join("drafts"), None);

        assert_eq!(storage.get("application draft").expect("read"), None);
        storage
            .set("application draft", "{\"a\":1}")
            .expect("write succeeds");
        assert!(storage.path_for("application draft").ends_with("application_draft.json"));
        assert_eq!(
            storage.get("application draft").expect("read"),
            Some("{\"a\":1}".to_string())
        );

        storage.remove("application draft").expect("remove");
        storage.remove("application draft").expect("idempotent remove");
        assert_eq!(storage.get("application draft").expect("read"), None);
    }

    #[test]
    fn file_storage_enforces_quota() {
        let dir = tempfile::tempdir().expect("scratch dir");
        let storage = FileDraftStorage::new(dir.path(), Some(2));
        assert!(matches!(
            storage.set("draft", "abc"),
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(storage.get("draft").expect("read"), None);
    }
}
