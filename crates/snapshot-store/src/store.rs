//! File-backed and in-memory snapshot stores.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// URL scheme for file-backed stores.
const FILE_SCHEME: &str = "file://";

/// URL scheme for memory-only stores.
const MEMORY_SCHEME: &str = "memory://";

/// JSON snapshot persisted to a single file.
pub struct FileStore {
    storage_path: PathBuf,
}

impl FileStore {
    /// Create a new file store.
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Save a snapshot.
    ///
    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash mid-write leaves the previous snapshot intact.
    pub async fn save<T: Serialize>(&self, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(value)?;

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.storage_path).await?;

        debug!(
            "Saved snapshot ({} bytes) to {:?}",
            data.len(),
            self.storage_path
        );
        Ok(())
    }

    /// Sibling path the snapshot is staged at before the rename.
    fn temp_path(&self) -> PathBuf {
        let mut path = self.storage_path.clone().into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }

    /// Load a snapshot.
    ///
    /// Returns `T::default()` if the file doesn't exist yet.
    pub async fn load<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        if !fs::try_exists(&self.storage_path).await? {
            info!(
                "Snapshot file not found at {:?}, starting empty",
                self.storage_path
            );
            return Ok(T::default());
        }

        let data = fs::read(&self.storage_path).await?;
        if data.iter().all(u8::is_ascii_whitespace) {
            warn!("Snapshot file {:?} is empty, starting empty", self.storage_path);
            return Ok(T::default());
        }

        let value = serde_json::from_slice(&data)?;
        debug!("Loaded snapshot from {:?}", self.storage_path);
        Ok(value)
    }
}

/// Store that keeps nothing beyond the process lifetime.
pub struct MemoryStore;

impl MemoryStore {
    /// "Save" does nothing for memory store.
    pub async fn save<T: Serialize>(&self, _value: &T) -> Result<(), StoreError> {
        debug!("Memory store: save is a no-op");
        Ok(())
    }

    /// "Load" returns an empty value.
    pub async fn load<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        debug!("Memory store: returning empty snapshot");
        Ok(T::default())
    }
}

/// Storage backend selected from a store URL.
pub enum Store {
    /// JSON file storage
    File(FileStore),
    /// In-memory only (no persistence)
    Memory(MemoryStore),
}

impl Store {
    /// Open a store from a URL.
    ///
    /// Accepted forms: `memory://` (or `memory`), `file://<path>`, or a bare
    /// filesystem path.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let url = url.trim();

        if url.is_empty() {
            return Err(StoreError::InvalidUrl("store URL is empty".into()));
        }

        if url == "memory" || url == MEMORY_SCHEME {
            return Ok(Self::memory());
        }

        if let Some(path) = url.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(StoreError::InvalidUrl(format!("{url}: missing file path")));
            }
            return Ok(Self::file(path));
        }

        if let Some((scheme, _)) = url.split_once("://") {
            return Err(StoreError::InvalidUrl(format!(
                "unsupported scheme '{scheme}'"
            )));
        }

        Ok(Self::file(url))
    }

    /// Force a file store.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Store::File(FileStore::new(path))
    }

    /// Force memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore)
    }

    /// Whether saved snapshots survive a restart.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Store::File(_))
    }

    /// Save a snapshot.
    pub async fn save<T: Serialize>(&self, value: &T) -> Result<(), StoreError> {
        match self {
            Store::File(s) => s.save(value).await,
            Store::Memory(s) => s.save(value).await,
        }
    }

    /// Load a snapshot.
    pub async fn load<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        match self {
            Store::File(s) => s.load().await,
            Store::Memory(s) => s.load().await,
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Store::File(s) => write!(f, "{FILE_SCHEME}{}", s.path().display()),
            Store::Memory(_) => f.write_str(MEMORY_SCHEME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        names: Vec<String>,
        next_id: u64,
    }

    fn sample() -> Snapshot {
        Snapshot {
            names: vec!["ada".into(), "grace".into()],
            next_id: 3,
        }
    }

    #[test]
    fn test_open_memory_urls() {
        assert!(matches!(Store::open("memory://").unwrap(), Store::Memory(_)));
        assert!(matches!(Store::open("memory").unwrap(), Store::Memory(_)));
    }

    #[test]
    fn test_open_file_urls() {
        match Store::open("file://data/identities.json").unwrap() {
            Store::File(s) => assert_eq!(s.path(), Path::new("data/identities.json")),
            Store::Memory(_) => panic!("expected file store"),
        }

        match Store::open("/var/lib/onboarding/profiles.json").unwrap() {
            Store::File(s) => {
                assert_eq!(s.path(), Path::new("/var/lib/onboarding/profiles.json"))
            }
            Store::Memory(_) => panic!("expected file store"),
        }
    }

    #[test]
    fn test_open_rejects_bad_urls() {
        assert!(Store::open("").is_err());
        assert!(Store::open("   ").is_err());
        assert!(Store::open("file://").is_err());
        assert!(Store::open("mongodb://localhost/onboarding").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Store::memory().to_string(), "memory://");
        assert_eq!(Store::file("a/b.json").to_string(), "file://a/b.json");
        assert!(!Store::memory().is_persistent());
        assert!(Store::file("a/b.json").is_persistent());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::file(dir.path().join("nested/dir/snapshot.json"));

        store.save(&sample()).await.unwrap();
        let loaded: Snapshot = store.load().await.unwrap();

        assert_eq!(loaded, sample());
        assert!(!dir.path().join("nested/dir/snapshot.json.tmp").exists());
    }

    #[test]
    fn test_temp_path_is_distinct_from_target() {
        let store = FileStore::new("data/snapshot.tmp");
        assert_eq!(store.temp_path(), Path::new("data/snapshot.tmp.tmp"));

        let store = FileStore::new("data/snapshot");
        assert_eq!(store.temp_path(), Path::new("data/snapshot.tmp"));
    }

    #[tokio::test]
    async fn test_file_store_target_with_tmp_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.tmp");
        let store = Store::file(&path);

        store.save(&sample()).await.unwrap();
        let loaded: Snapshot = store.load().await.unwrap();

        assert_eq!(loaded, sample());
        assert!(path.exists());
        assert!(!dir.path().join("snapshot.tmp.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::file(dir.path().join("absent.json"));

        let loaded: Snapshot = store.load().await.unwrap();
        assert_eq!(loaded, Snapshot::default());
    }

    #[tokio::test]
    async fn test_file_store_empty_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "\n").unwrap();

        let loaded: Snapshot = Store::file(&path).load().await.unwrap();
        assert_eq!(loaded, Snapshot::default());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        std::fs::write(&path, "{not json").unwrap();

        let result: Result<Snapshot, _> = Store::file(&path).load().await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_file_store_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = Store::file(blocker.join("snapshot.json"));
        let result = store.save(&sample()).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_memory_store_operations() {
        let store = Store::memory();

        store.save(&sample()).await.unwrap();

        // Load still returns empty (no persistence)
        let loaded: Snapshot = store.load().await.unwrap();
        assert_eq!(loaded, Snapshot::default());
    }
}
