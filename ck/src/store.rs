//! Core ThreadStore implementation

use eyre::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Unique identifier for a conversation thread (caller supplied)
pub type ThreadId = String;

/// Validate a thread id for use as a file name component
///
/// Thread ids come from callers, so anything that could escape the store
/// directory is rejected.
pub fn validate_thread_id(thread_id: &str) -> Result<()> {
    if thread_id.is_empty() {
        bail!("Thread id must not be empty");
    }
    if thread_id.len() > 128 {
        bail!("Thread id too long (max 128 chars): {}", thread_id);
    }
    if !thread_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        bail!(
            "Thread id may only contain alphanumerics, '-', '_' and '.': {}",
            thread_id
        );
    }
    if thread_id.starts_with('.') {
        bail!("Thread id must not start with '.': {}", thread_id);
    }
    Ok(())
}

/// The per-thread checkpoint store
pub struct ThreadStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl ThreadStore {
    /// Open or create a thread store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened thread store");
        Ok(Self { base_path })
    }

    fn snapshot_path(&self, thread_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.{}", thread_id, crate::SNAPSHOT_EXT))
    }

    /// Load the snapshot for a thread
    ///
    /// Returns `T::default()` when the thread has no snapshot yet - a brand
    /// new thread starts from the empty state.
    pub fn load<T: DeserializeOwned + Default>(&self, thread_id: &str) -> Result<T> {
        validate_thread_id(thread_id)?;
        let path = self.snapshot_path(thread_id);

        if !path.exists() {
            debug!(thread_id, "No snapshot, returning default state");
            return Ok(T::default());
        }

        let content =
            fs::read_to_string(&path).context(format!("Failed to read snapshot: {}", path.display()))?;
        serde_json::from_str(&content).context(format!("Corrupt snapshot for thread: {}", thread_id))
    }

    /// Save the snapshot for a thread
    ///
    /// Writes to a temp file in the same directory and renames it over the
    /// snapshot, so readers never observe a partial write and re-saving the
    /// same state is harmless.
    pub fn save<T: Serialize>(&self, thread_id: &str, state: &T) -> Result<()> {
        validate_thread_id(thread_id)?;
        let path = self.snapshot_path(thread_id);
        let tmp_path = self.base_path.join(format!(".{}.tmp", thread_id));

        let content = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
        fs::write(&tmp_path, content).context(format!("Failed to write snapshot: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path).context(format!("Failed to commit snapshot: {}", path.display()))?;

        debug!(thread_id, "Saved snapshot");
        Ok(())
    }

    /// Check whether a thread has a snapshot
    pub fn exists(&self, thread_id: &str) -> Result<bool> {
        validate_thread_id(thread_id)?;
        Ok(self.snapshot_path(thread_id).exists())
    }

    /// Raw snapshot content for a thread, if present (for inspection tools)
    pub fn raw(&self, thread_id: &str) -> Result<Option<String>> {
        validate_thread_id(thread_id)?;
        let path = self.snapshot_path(thread_id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    /// List all thread ids with a snapshot
    pub fn list(&self) -> Result<Vec<ThreadId>> {
        let mut threads = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == crate::SNAPSHOT_EXT).unwrap_or(false)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && !stem.starts_with('.')
            {
                threads.push(stem.to_string());
            }
        }

        threads.sort();
        Ok(threads)
    }

    /// Delete a thread's snapshot
    ///
    /// Deleting a thread that does not exist is a no-op; the control loop
    /// never calls this, it is an administrative operation.
    pub fn delete(&self, thread_id: &str) -> Result<()> {
        validate_thread_id(thread_id)?;
        let path = self.snapshot_path(thread_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!(thread_id, "Deleted thread snapshot");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct TestState {
        objective: String,
        steps: Vec<String>,
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp = TempDir::new().unwrap();
        let store = ThreadStore::open(temp.path()).unwrap();

        let state: TestState = store.load("fresh").unwrap();
        assert_eq!(state, TestState::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = ThreadStore::open(temp.path()).unwrap();

        let state = TestState {
            objective: "book a flight".to_string(),
            steps: vec!["search".to_string(), "book".to_string()],
        };
        store.save("t1", &state).unwrap();

        let loaded: TestState = store.load("t1").unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_load_twice_without_save_is_identical() {
        let temp = TempDir::new().unwrap();
        let store = ThreadStore::open(temp.path()).unwrap();

        let state = TestState {
            objective: "x".to_string(),
            steps: vec!["a".to_string()],
        };
        store.save("t1", &state).unwrap();

        let first: TestState = store.load("t1").unwrap();
        let second: TestState = store.load("t1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = ThreadStore::open(temp.path()).unwrap();

        let state = TestState {
            objective: "same".to_string(),
            steps: vec![],
        };
        store.save("t1", &state).unwrap();
        store.save("t1", &state).unwrap();

        let loaded: TestState = store.load("t1").unwrap();
        assert_eq!(loaded, state);
        assert_eq!(store.list().unwrap(), vec!["t1".to_string()]);
    }

    #[test]
    fn test_list_and_delete() {
        let temp = TempDir::new().unwrap();
        let store = ThreadStore::open(temp.path()).unwrap();

        store.save("alpha", &TestState::default()).unwrap();
        store.save("beta", &TestState::default()).unwrap();

        let threads = store.list().unwrap();
        assert_eq!(threads, vec!["alpha".to_string(), "beta".to_string()]);

        store.delete("alpha").unwrap();
        assert_eq!(store.list().unwrap(), vec!["beta".to_string()]);

        // Deleting again is a no-op
        store.delete("alpha").unwrap();
    }

    #[test]
    fn test_invalid_thread_ids_rejected() {
        assert!(validate_thread_id("default").is_ok());
        assert!(validate_thread_id("trip-2025_09.a").is_ok());

        assert!(validate_thread_id("").is_err());
        assert!(validate_thread_id("../escape").is_err());
        assert!(validate_thread_id("a/b").is_err());
        assert!(validate_thread_id(".hidden").is_err());
        assert!(validate_thread_id(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let store = ThreadStore::open(temp.path()).unwrap();

        store.save("t1", &TestState::default()).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
