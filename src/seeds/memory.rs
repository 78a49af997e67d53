//! In-memory seed store with skip-locked claims and JSON snapshots.
//!
//! Each row carries its own mutex. A claim walks rows in insertion order
//! and `try_lock`s each candidate: a row held by another claim is
//! skipped, never waited on. Selection and marking happen under the
//! same row lock, so two claims can never both see a row as unused.
//!
//! The claim mutex guards nothing but the right to mark a row. Readers
//! (`get`, `records`, `persist`) go through the row's `state` lock and
//! never touch it, and `reset_all` takes it only under the store-wide
//! write lock. A claim that finds a row's claim mutex held is therefore
//! racing another claim that will mark that row used, so seeing nothing
//! but held or used rows is exhaustion, not contention.

use super::store::{SeedRecord, SeedStore, StoreCounts, StoreError};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Default)]
struct RowState {
    used: bool,
    used_at: Option<DateTime<Utc>>,
    used_by: Option<String>,
}

#[derive(Debug)]
struct Row {
    token: String,
    /// Lock-free copy of `state.used` for the claim scan.
    used: AtomicBool,
    /// Held by at most one claim; readers never take it.
    claim: Mutex<()>,
    /// Written only while `claim` is held.
    state: RwLock<RowState>,
}

impl Row {
    fn from_record(record: SeedRecord) -> Self {
        Self {
            token: record.token,
            used: AtomicBool::new(record.used),
            claim: Mutex::new(()),
            state: RwLock::new(RowState {
                used: record.used,
                used_at: record.used_at,
                used_by: record.used_by,
            }),
        }
    }

    fn to_record(&self) -> SeedRecord {
        let state = self.state.read();
        SeedRecord {
            token: self.token.clone(),
            used: state.used,
            used_at: state.used_at,
            used_by: state.used_by.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Rows {
    rows: Vec<Row>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    records: Vec<SeedRecord>,
}

/// Seed store held in process memory.
#[derive(Debug, Default)]
pub struct MemorySeedStore {
    inner: RwLock<Rows>,
    used: AtomicUsize,
    /// Every row below this index is known to be used.
    used_prefix: AtomicUsize,
}

impl MemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records, rejecting duplicate tokens.
    pub fn from_records(records: Vec<SeedRecord>) -> Result<Self, StoreError> {
        let mut rows = Rows::default();
        let mut used = 0;
        for record in records {
            if rows.index.contains_key(&record.token) {
                return Err(StoreError::DuplicateToken(record.token));
            }
            if record.used {
                used += 1;
            }
            rows.index.insert(record.token.clone(), rows.rows.len());
            rows.rows.push(Row::from_record(record));
        }
        Ok(Self {
            inner: RwLock::new(rows),
            used: AtomicUsize::new(used),
            used_prefix: AtomicUsize::new(0),
        })
    }

    /// Loads a snapshot written by [`persist`](Self::persist).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.version != SNAPSHOT_VERSION {
            tracing::warn!(
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "Seed snapshot version mismatch, loading anyway"
            );
        }
        let store = Self::from_records(snapshot.records)?;
        tracing::info!(
            path = %path.as_ref().display(),
            total = store.inner.read().rows.len(),
            used = store.used.load(Ordering::Acquire),
            "Loaded seed snapshot"
        );
        Ok(store)
    }

    /// Loads `path` if it exists, otherwise returns an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Writes every record to `path`, replacing it atomically.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let records = self.records();
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            records,
        };
        let json = serde_json::to_string(&snapshot)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), "Persisted seed snapshot");
        Ok(())
    }

    /// Copies out every record in key order.
    pub fn records(&self) -> Vec<SeedRecord> {
        self.inner.read().rows.iter().map(Row::to_record).collect()
    }
}

impl SeedStore for MemorySeedStore {
    fn insert_missing(&self, tokens: &[String]) -> Result<usize, StoreError> {
        let mut inner = self.inner.write();
        let mut inserted = 0;
        for token in tokens {
            if inner.index.contains_key(token) {
                continue;
            }
            let idx = inner.rows.len();
            inner.index.insert(token.clone(), idx);
            inner.rows.push(Row::from_record(SeedRecord::unused(token.clone())));
            inserted += 1;
        }
        Ok(inserted)
    }

    fn claim_next(
        &self,
        consumer_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<SeedRecord>, StoreError> {
        let inner = self.inner.read();
        let start = self.used_prefix.load(Ordering::Acquire).min(inner.rows.len());
        let mut prefix_known_used = true;

        for (offset, row) in inner.rows[start..].iter().enumerate() {
            let idx = start + offset;
            if row.used.load(Ordering::Acquire) {
                continue;
            }
            let Some(_claim) = row.claim.try_lock() else {
                // held by a concurrent claim: skip, do not wait
                prefix_known_used = false;
                continue;
            };
            if row.used.load(Ordering::Acquire) {
                continue;
            }

            let record = {
                let mut state = row.state.write();
                state.used = true;
                state.used_at = Some(at);
                state.used_by = consumer_id.map(str::to_string);
                SeedRecord {
                    token: row.token.clone(),
                    used: true,
                    used_at: state.used_at,
                    used_by: state.used_by.clone(),
                }
            };
            row.used.store(true, Ordering::Release);
            self.used.fetch_add(1, Ordering::AcqRel);
            if prefix_known_used {
                self.used_prefix.fetch_max(idx + 1, Ordering::AcqRel);
            }

            return Ok(Some(record));
        }

        if prefix_known_used {
            self.used_prefix.fetch_max(inner.rows.len(), Ordering::AcqRel);
        }
        Ok(None)
    }

    fn peek_next(&self) -> Result<Option<String>, StoreError> {
        let inner = self.inner.read();
        let start = self.used_prefix.load(Ordering::Acquire).min(inner.rows.len());
        Ok(inner.rows[start..]
            .iter()
            .find(|row| !row.used.load(Ordering::Acquire))
            .map(|row| row.token.clone()))
    }

    fn counts(&self) -> Result<StoreCounts, StoreError> {
        let inner = self.inner.read();
        Ok(StoreCounts {
            total: inner.rows.len(),
            used: self.used.load(Ordering::Acquire),
        })
    }

    fn get(&self, token: &str) -> Result<Option<SeedRecord>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .index
            .get(token)
            .and_then(|&idx| inner.rows.get(idx))
            .map(Row::to_record))
    }

    fn tokens(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.inner.read().rows.iter().map(|r| r.token.clone()).collect())
    }

    fn reset_all(&self) -> Result<usize, StoreError> {
        // the write lock excludes every in-flight claim
        let inner = self.inner.write();
        let mut reset = 0;
        for row in &inner.rows {
            let _claim = row.claim.lock();
            if row.used.swap(false, Ordering::AcqRel) {
                reset += 1;
            }
            *row.state.write() = RowState::default();
        }
        self.used.store(0, Ordering::Release);
        self.used_prefix.store(0, Ordering::Release);
        Ok(reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> MemorySeedStore {
        let store = MemorySeedStore::new();
        let tokens: Vec<String> = (0..n).map(|i| format!("token-{i:04}")).collect();
        store.insert_missing(&tokens).unwrap();
        store
    }

    #[test]
    fn test_insert_skips_duplicates() {
        let store = store_with(3);
        let again = vec!["token-0001".to_string(), "token-9999".to_string()];
        assert_eq!(store.insert_missing(&again).unwrap(), 1);
        assert_eq!(store.counts().unwrap().total, 4);
    }

    #[test]
    fn test_claims_in_insertion_order() {
        let store = store_with(3);
        let now = Utc::now();
        let first = store.claim_next(Some("alice"), now).unwrap().unwrap();
        assert_eq!(first.token, "token-0000");
        assert_eq!(first.used_by.as_deref(), Some("alice"));
        assert_eq!(first.used_at, Some(now));

        let second = store.claim_next(None, now).unwrap().unwrap();
        assert_eq!(second.token, "token-0001");
        assert_eq!(second.used_by, None);
        assert_eq!(store.counts().unwrap(), StoreCounts { total: 3, used: 2 });
    }

    #[test]
    fn test_claim_skips_locked_row() {
        let store = store_with(2);
        let inner = store.inner.read();
        let _held = inner.rows[0].claim.lock();
        let claimed = store.claim_next(None, Utc::now()).unwrap().unwrap();
        assert_eq!(claimed.token, "token-0001");
    }

    #[test]
    fn test_readers_never_hide_an_unused_row() {
        let store = MemorySeedStore::new();
        store.insert_missing(&["only".to_string()]).unwrap();
        let stop = AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    assert!(store.get("only").unwrap().is_some());
                    let _ = store.records();
                }
            });

            for _ in 0..500 {
                let claimed = store.claim_next(Some("reader-race"), Utc::now()).unwrap();
                assert_eq!(claimed.map(|r| r.token).as_deref(), Some("only"));
                assert_eq!(store.reset_all().unwrap(), 1);
            }
            stop.store(true, Ordering::Relaxed);
        });
    }

    #[test]
    fn test_record_reads_are_consistent() {
        let store = store_with(1);
        let now = Utc::now();
        store.claim_next(Some("dana"), now).unwrap();
        let record = store.get("token-0000").unwrap().unwrap();
        assert!(record.used);
        assert_eq!(record.used_at, Some(now));
        assert_eq!(record.used_by.as_deref(), Some("dana"));
    }

    #[test]
    fn test_exhaustion_returns_none() {
        let store = store_with(1);
        assert!(store.claim_next(None, Utc::now()).unwrap().is_some());
        assert!(store.claim_next(None, Utc::now()).unwrap().is_none());
        assert!(store.peek_next().unwrap().is_none());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let store = store_with(2);
        assert_eq!(store.peek_next().unwrap().as_deref(), Some("token-0000"));
        assert_eq!(store.peek_next().unwrap().as_deref(), Some("token-0000"));
        assert_eq!(store.counts().unwrap().used, 0);
    }

    #[test]
    fn test_reset_restores_everything() {
        let store = store_with(2);
        store.claim_next(Some("bob"), Utc::now()).unwrap();
        store.claim_next(Some("bob"), Utc::now()).unwrap();
        assert_eq!(store.reset_all().unwrap(), 2);
        assert_eq!(store.counts().unwrap().used, 0);
        let rec = store.get("token-0000").unwrap().unwrap();
        assert_eq!(rec, SeedRecord::unused("token-0000"));
        assert_eq!(
            store.claim_next(None, Utc::now()).unwrap().unwrap().token,
            "token-0000"
        );
    }

    #[test]
    fn test_snapshot_round_trip_preserves_claims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");

        let store = store_with(3);
        store.claim_next(Some("carol"), Utc::now()).unwrap();
        store.persist(&path).unwrap();

        let loaded = MemorySeedStore::load(&path).unwrap();
        assert_eq!(loaded.counts().unwrap(), StoreCounts { total: 3, used: 1 });
        assert_eq!(loaded.records(), store.records());
        assert_eq!(
            loaded.claim_next(None, Utc::now()).unwrap().unwrap().token,
            "token-0001"
        );
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemorySeedStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.counts().unwrap().total, 0);
    }

    #[test]
    fn test_duplicate_records_rejected() {
        let records = vec![SeedRecord::unused("a"), SeedRecord::unused("a")];
        assert!(matches!(
            MemorySeedStore::from_records(records),
            Err(StoreError::DuplicateToken(_))
        ));
    }
}
