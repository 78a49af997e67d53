//! Cached forge lock status.
//!
//! Computing pool stats is cheap for the in-memory store but not for
//! every backend, so the answer is cached for a short TTL. A fresh
//! claim must call [`ForgeLockStatusCache::invalidate`] so the next
//! reader sees the new count.

use super::pool::{ExclusiveSeedPool, PoolError, PoolStats};
use super::store::SeedStore;
use super::MemorySeedStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Coarse pool availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockLevel {
    /// Plenty of seeds left.
    Available,
    /// Fewer seeds left than the critical threshold.
    Critical,
    /// No seeds left. The forge is locked.
    Exhausted,
}

impl LockLevel {
    pub fn from_available(available: usize, critical_threshold: usize) -> Self {
        if available == 0 {
            LockLevel::Exhausted
        } else if available < critical_threshold {
            LockLevel::Critical
        } else {
            LockLevel::Available
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockLevel::Available => "available",
            LockLevel::Critical => "critical",
            LockLevel::Exhausted => "exhausted",
        }
    }
}

/// Public view of pool availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeLockStatus {
    pub is_locked: bool,
    pub total_seeds: usize,
    pub used_seeds: usize,
    pub available_seeds: usize,
    pub percentage_used: f64,
    pub level: LockLevel,
    pub message: String,
}

impl ForgeLockStatus {
    pub fn from_stats(stats: PoolStats, critical_threshold: usize) -> Self {
        let level = LockLevel::from_available(stats.available, critical_threshold);
        let message = match level {
            LockLevel::Exhausted => format!(
                "The forge is locked. All {} exclusive seeds have been claimed.",
                stats.total
            ),
            LockLevel::Critical => format!(
                "Only {} of {} exclusive seeds remain.",
                stats.available, stats.total
            ),
            LockLevel::Available => format!(
                "{} of {} exclusive seeds available.",
                stats.available, stats.total
            ),
        };
        Self {
            is_locked: level == LockLevel::Exhausted,
            total_seeds: stats.total,
            used_seeds: stats.used,
            available_seeds: stats.available,
            percentage_used: stats.percentage_used,
            level,
            message,
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCacheConfig {
    /// How long a computed status is served before recomputing.
    pub ttl_secs: u64,
    /// Remaining seeds below which the level is critical.
    pub critical_threshold: usize,
}

impl Default for StatusCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60,
            critical_threshold: 100,
        }
    }
}

impl StatusCacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone)]
struct CachedStatus {
    computed_at: Instant,
    value: ForgeLockStatus,
}

/// TTL cache in front of [`ExclusiveSeedPool::stats`].
pub struct ForgeLockStatusCache<S: SeedStore = MemorySeedStore> {
    pool: Arc<ExclusiveSeedPool<S>>,
    config: StatusCacheConfig,
    cached: Mutex<Option<CachedStatus>>,
}

impl<S: SeedStore> ForgeLockStatusCache<S> {
    pub fn new(pool: Arc<ExclusiveSeedPool<S>>, config: StatusCacheConfig) -> Self {
        Self {
            pool,
            config,
            cached: Mutex::new(None),
        }
    }

    /// Current status, recomputed when the cached value is older than the TTL.
    pub fn status(&self) -> Result<ForgeLockStatus, PoolError> {
        self.status_at(Instant::now())
    }

    fn status_at(&self, now: Instant) -> Result<ForgeLockStatus, PoolError> {
        let mut cached = self.cached.lock();
        if let Some(entry) = cached.as_ref() {
            if now.saturating_duration_since(entry.computed_at) < self.config.ttl() {
                return Ok(entry.value.clone());
            }
        }

        let value = ForgeLockStatus::from_stats(self.pool.stats()?, self.config.critical_threshold);
        if value.level != LockLevel::Available {
            tracing::info!(
                available = value.available_seeds,
                level = value.level.as_str(),
                "Forge lock status"
            );
        }
        *cached = Some(CachedStatus {
            computed_at: now,
            value: value.clone(),
        });
        Ok(value)
    }

    pub fn is_locked(&self) -> Result<bool, PoolError> {
        Ok(self.status()?.is_locked)
    }

    /// Drops the cached value.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }

    /// Fails with [`PoolError::ForgeLocked`] when the pool is exhausted.
    pub fn enforce_not_locked(&self) -> Result<(), PoolError> {
        let status = self.status()?;
        if status.is_locked {
            return Err(PoolError::ForgeLocked {
                total: status.total_seeds,
            });
        }
        Ok(())
    }

    pub fn config(&self) -> &StatusCacheConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<ExclusiveSeedPool<S>> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::PoolConfig;

    fn cache_over(total: usize) -> ForgeLockStatusCache {
        let pool = ExclusiveSeedPool::new(
            MemorySeedStore::new(),
            PoolConfig {
                total,
                ..Default::default()
            },
        );
        pool.initialize().unwrap();
        ForgeLockStatusCache::new(
            Arc::new(pool),
            StatusCacheConfig {
                ttl_secs: 60,
                critical_threshold: 2,
            },
        )
    }

    #[test]
    fn test_levels() {
        assert_eq!(LockLevel::from_available(0, 100), LockLevel::Exhausted);
        assert_eq!(LockLevel::from_available(99, 100), LockLevel::Critical);
        assert_eq!(LockLevel::from_available(100, 100), LockLevel::Available);
    }

    #[test]
    fn test_cached_value_is_stale_until_invalidated() {
        let cache = cache_over(3);
        assert_eq!(cache.status().unwrap().available_seeds, 3);

        cache.pool.consume_next(None).unwrap();
        assert_eq!(cache.status().unwrap().available_seeds, 3);

        cache.invalidate();
        let status = cache.status().unwrap();
        assert_eq!(status.available_seeds, 2);
        assert_eq!(status.level, LockLevel::Available);
    }

    #[test]
    fn test_ttl_expiry_recomputes() {
        let cache = cache_over(2);
        let start = Instant::now();
        cache.status_at(start).unwrap();
        cache.pool.consume_next(None).unwrap();

        let within = cache.status_at(start + Duration::from_secs(59)).unwrap();
        assert_eq!(within.used_seeds, 0);
        let after = cache.status_at(start + Duration::from_secs(60)).unwrap();
        assert_eq!(after.used_seeds, 1);
        assert_eq!(after.level, LockLevel::Critical);
    }

    #[test]
    fn test_exhausted_pool_is_locked() {
        let cache = cache_over(1);
        assert!(cache.enforce_not_locked().is_ok());
        cache.pool.consume_next(None).unwrap();
        cache.invalidate();

        assert!(cache.is_locked().unwrap());
        let status = cache.status().unwrap();
        assert_eq!(status.percentage_used, 100.0);
        assert!(status.message.contains("locked"));
        assert!(matches!(
            cache.enforce_not_locked(),
            Err(PoolError::ForgeLocked { total: 1 })
        ));
    }
}
