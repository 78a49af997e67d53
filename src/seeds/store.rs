//! Storage seam for pool records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One pool token and its consumption state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub token: String,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub used_by: Option<String>,
}

impl SeedRecord {
    /// A fresh, unused record.
    pub fn unused(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            used: false,
            used_at: None,
            used_by: None,
        }
    }
}

/// Row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub total: usize,
    pub used: usize,
}

/// Errors raised by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Every visible candidate was locked by another claim. Retry.
    #[error("all candidate rows are locked by concurrent claims")]
    Contention,
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is malformed: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("snapshot contains duplicate token {0}")]
    DuplicateToken(String),
}

/// Durable collection of pool records.
///
/// Implementations must make [`claim_next`](SeedStore::claim_next) a
/// single atomic unit: choose the first unused row in a stable order
/// while holding an exclusive lock on that row, mark it used, release.
/// Rows locked by a concurrent claim are skipped, never waited on.
pub trait SeedStore: Send + Sync {
    /// Inserts the tokens not already present. Returns how many were new.
    fn insert_missing(&self, tokens: &[String]) -> Result<usize, StoreError>;

    /// Claims the next unused record, or `None` if none is visible.
    fn claim_next(
        &self,
        consumer_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<SeedRecord>, StoreError>;

    /// First unused token, without locking. Advisory only.
    fn peek_next(&self) -> Result<Option<String>, StoreError>;

    fn counts(&self) -> Result<StoreCounts, StoreError>;

    fn get(&self, token: &str) -> Result<Option<SeedRecord>, StoreError>;

    /// Every stored token.
    fn tokens(&self) -> Result<Vec<String>, StoreError>;

    /// Marks every record unused. Returns how many were reset.
    fn reset_all(&self) -> Result<usize, StoreError>;
}
