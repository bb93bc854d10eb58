use crate::core::counters::{CounterError, CounterKind, CounterStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// One plain-text file per user per counter: `<root>/<kind>/<user_id>.txt`.
pub struct FileCounterStore {
    root: PathBuf,
    // Serializes read-increment-write across every counter in the process.
    lock: Mutex<()>,
}

impl FileCounterStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    fn counter_path(&self, kind: CounterKind, user_id: u64) -> PathBuf {
        self.root
            .join(kind.dir_name())
            .join(format!("{}.txt", user_id))
    }

    async fn read_count(path: &Path) -> Result<u64, CounterError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };

        content
            .trim()
            .parse::<u64>()
            .map_err(|_| CounterError::Corrupt {
                path: path.to_path_buf(),
                content,
            })
    }
}

#[async_trait]
impl CounterStore for FileCounterStore {
    async fn increment(&self, kind: CounterKind, user_id: u64) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().await;

        let path = self.counter_path(kind, user_id);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let count = Self::read_count(&path).await? + 1;

        // Write next to the real file, then swap it in so readers never see half a number.
        let staged = path.with_extension("txt.new");
        tokio::fs::write(&staged, count.to_string()).await?;
        tokio::fs::rename(&staged, &path).await?;

        Ok(count)
    }

    async fn write_scratch_file(
        &self,
        file_name: &str,
        content: &str,
    ) -> Result<PathBuf, CounterError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        tokio::fs::write(&path, content).await?;

        let written = tokio::fs::read_to_string(&path).await?;
        if written != content {
            return Err(CounterError::Unverified(path));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_first_increment_creates_file() {
        let dir = TempDir::new().unwrap();
        let store = FileCounterStore::new(dir.path());

        assert_eq!(store.increment(CounterKind::HowManyTimes, 42).await.unwrap(), 1);
        let on_disk = std::fs::read_to_string(dir.path().join("howmanytimes/42.txt")).unwrap();
        assert_eq!(on_disk, "1");
        assert!(!dir.path().join("howmanytimes/42.txt.new").exists());
    }

    #[tokio::test]
    async fn test_counters_are_per_user_and_kind() {
        let dir = TempDir::new().unwrap();
        let store = FileCounterStore::new(dir.path());

        store.increment(CounterKind::HowManyTimes, 1).await.unwrap();
        store.increment(CounterKind::HowManyTimes, 1).await.unwrap();
        assert_eq!(store.increment(CounterKind::HowManyTimes, 1).await.unwrap(), 3);
        assert_eq!(store.increment(CounterKind::HowManyTimes, 2).await.unwrap(), 1);
        assert_eq!(store.increment(CounterKind::HowManyButton, 1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_existing_file_is_continued() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("howmanybutton")).unwrap();
        std::fs::write(dir.path().join("howmanybutton/7.txt"), "41\n").unwrap();

        let store = FileCounterStore::new(dir.path());
        assert_eq!(store.increment(CounterKind::HowManyButton, 7).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("howmanytimes")).unwrap();
        std::fs::write(dir.path().join("howmanytimes/7.txt"), "lots").unwrap();

        let store = FileCounterStore::new(dir.path());
        let err = store.increment(CounterKind::HowManyTimes, 7).await.unwrap_err();
        assert!(matches!(err, CounterError::Corrupt { ref content, .. } if content == "lots"));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(FileCounterStore::new(dir.path()));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment(CounterKind::HowManyTimes, 9).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.increment(CounterKind::HowManyTimes, 9).await.unwrap(), 21);
    }

    #[tokio::test]
    async fn test_scratch_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileCounterStore::new(dir.path().join("nested"));

        let path = store
            .write_scratch_file("123456.txt", "long answer")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("nested/123456.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "long answer");
    }
}
