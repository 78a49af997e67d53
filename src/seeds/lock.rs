//! Cross-process lock around a seed snapshot.
//!
//! The snapshot itself is replaced by rename on every persist, so the
//! lock lives on a sibling `<snapshot>.lock` file that is never moved.
//! Hold an exclusive lock from the moment the snapshot is opened until
//! it has been persisted; every claim made in between is then visible
//! to the next process that takes the lock and re-reads the file.

use super::store::StoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Advisory lock on a snapshot file, released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
    path: PathBuf,
}

impl SnapshotLock {
    /// Blocks until no other holder has the snapshot, then takes it
    /// exclusively.
    pub fn exclusive(snapshot: impl AsRef<Path>) -> Result<Self, StoreError> {
        let lock = Self::open(snapshot.as_ref())?;
        lock.file.lock_exclusive()?;
        tracing::debug!(path = %lock.path.display(), "Took exclusive snapshot lock");
        Ok(lock)
    }

    /// Blocks until no exclusive holder remains. Readers share the lock.
    pub fn shared(snapshot: impl AsRef<Path>) -> Result<Self, StoreError> {
        let lock = Self::open(snapshot.as_ref())?;
        lock.file.lock_shared()?;
        Ok(lock)
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(snapshot: &Path) -> Result<Self, StoreError> {
        let mut name = snapshot.as_os_str().to_owned();
        name.push(".lock");
        let path = PathBuf::from(name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        Ok(Self { file, path })
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), "Failed to release snapshot lock: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::{MemorySeedStore, SeedStore};
    use chrono::Utc;

    #[test]
    fn test_lock_file_sits_beside_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let lock = SnapshotLock::exclusive(dir.path().join("pool.json")).unwrap();
        assert_eq!(lock.path(), dir.path().join("pool.json.lock"));
        assert!(lock.path().exists());
    }

    #[test]
    fn test_exclusive_holder_blocks_second_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        let held = SnapshotLock::exclusive(&path).unwrap();

        let other = SnapshotLock::open(&path).unwrap();
        assert!(other.file.try_lock_exclusive().is_err());
        drop(held);
        assert!(other.file.try_lock_exclusive().is_ok());
    }

    #[test]
    fn test_locked_sessions_never_share_a_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        let seed = MemorySeedStore::new();
        seed.insert_missing(&["t0".to_string(), "t1".to_string()]).unwrap();
        seed.persist(&path).unwrap();

        let claimed: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = ["alice", "bob"]
                .into_iter()
                .map(|who| {
                    let path = &path;
                    s.spawn(move || {
                        let _lock = SnapshotLock::exclusive(path).unwrap();
                        let store = MemorySeedStore::open(path).unwrap();
                        let record = store.claim_next(Some(who), Utc::now()).unwrap().unwrap();
                        store.persist(path).unwrap();
                        record.token
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_ne!(claimed[0], claimed[1]);
        let reloaded = MemorySeedStore::load(&path).unwrap();
        assert_eq!(reloaded.counts().unwrap().used, 2);
    }
}
