//! The capped pool of exclusive seeds.

use super::memory::MemorySeedStore;
use super::store::{SeedRecord, SeedStore, StoreError};
use super::token::{generate_unique, BudgetExhausted};
use chrono::Utc;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Number of exclusive seeds that will ever exist.
pub const TOTAL_SEEDS: usize = 9000;

/// Deployment environment. Gates administrative operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

/// Pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Pool cardinality.
    pub total: usize,
    /// Claim attempts before contention is reported to the caller.
    pub max_claim_attempts: u32,
    /// Deployment environment.
    pub environment: Environment,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            total: TOTAL_SEEDS,
            max_claim_attempts: 3,
            environment: Environment::Development,
        }
    }
}

/// Pool errors. Exhaustion is not one of them.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error(
        "could not generate unique seed tokens: {generated} new after {attempts} attempts, \
         randomness source is broken"
    )]
    TokenGeneration { attempts: usize, generated: usize },
    #[error("seed claim still contended after {attempts} attempts")]
    Contention { attempts: u32 },
    #[error("bulk reset is disabled in production")]
    ResetForbidden,
    #[error("the forge is locked: all {total} exclusive seeds have been claimed")]
    ForgeLocked { total: usize },
    #[error("seed store error: {0}")]
    Store(#[from] StoreError),
}

impl From<BudgetExhausted> for PoolError {
    fn from(e: BudgetExhausted) -> Self {
        PoolError::TokenGeneration {
            attempts: e.attempts,
            generated: e.generated,
        }
    }
}

/// Aggregate pool state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub total: usize,
    pub used: usize,
    pub available: usize,
    /// Percentage of the pool claimed, rounded to two decimals.
    pub percentage_used: f64,
}

impl PoolStats {
    pub fn from_counts(total: usize, used: usize) -> Self {
        let percentage_used = if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64 * 10_000.0).round() / 100.0
        };
        Self {
            total,
            used,
            available: total.saturating_sub(used),
            percentage_used,
        }
    }
}

/// Outcome of [`ExclusiveSeedPool::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub inserted: usize,
    pub total: usize,
}

/// Fixed-size pool of single-use tokens with exactly-once claims.
pub struct ExclusiveSeedPool<S: SeedStore = MemorySeedStore> {
    store: S,
    config: PoolConfig,
}

impl<S: SeedStore> ExclusiveSeedPool<S> {
    pub fn new(store: S, config: PoolConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Fills the store up to the configured total from the OS CSPRNG.
    ///
    /// Idempotent: a populated store is left alone, and tokens already
    /// present are never duplicated.
    pub fn initialize(&self) -> Result<InitReport, PoolError> {
        self.initialize_with(&mut OsRng)
    }

    /// [`initialize`](Self::initialize) with a caller-supplied source.
    pub fn initialize_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<InitReport, PoolError> {
        let target = self.config.total;
        let mut counts = self.store.counts()?;
        if counts.total >= target {
            tracing::debug!(total = counts.total, "Seed pool already initialized");
            return Ok(InitReport {
                inserted: 0,
                total: counts.total,
            });
        }

        let existing: HashSet<String> = self.store.tokens()?.into_iter().collect();
        let mut inserted = 0;
        while counts.total < target {
            let needed = target - counts.total;
            let tokens = generate_unique(rng, needed, &existing, target)?;
            let added = self.store.insert_missing(&tokens)?;
            inserted += added;
            counts = self.store.counts()?;
            if added == 0 {
                // a concurrent initializer filled the gap with other tokens
                break;
            }
        }

        tracing::info!(inserted, total = counts.total, "Seed pool initialized");
        Ok(InitReport {
            inserted,
            total: counts.total,
        })
    }

    /// Claims the next unused seed.
    ///
    /// `Ok(None)` means the pool is exhausted; that is an expected
    /// outcome, not an error. Contention is retried up to
    /// `max_claim_attempts` times without backoff.
    pub fn consume_next(&self, consumer_id: Option<&str>) -> Result<Option<String>, PoolError> {
        Ok(self.claim(consumer_id)?.map(|record| record.token))
    }

    /// Like [`consume_next`](Self::consume_next) but returns the full record.
    pub fn claim(&self, consumer_id: Option<&str>) -> Result<Option<SeedRecord>, PoolError> {
        let attempts = self.config.max_claim_attempts.max(1);
        for attempt in 1..=attempts {
            match self.store.claim_next(consumer_id, Utc::now()) {
                Ok(Some(record)) => {
                    tracing::debug!(
                        token_prefix = &record.token[..record.token.len().min(8)],
                        consumer = consumer_id.unwrap_or("-"),
                        attempt,
                        "Claimed exclusive seed"
                    );
                    return Ok(Some(record));
                }
                Ok(None) => {
                    tracing::info!(consumer = consumer_id.unwrap_or("-"), "Seed pool exhausted");
                    return Ok(None);
                }
                Err(StoreError::Contention) => {
                    tracing::debug!(attempt, attempts, "Seed claim contended, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        tracing::warn!(attempts, "Seed claim contention persisted");
        Err(PoolError::Contention { attempts })
    }

    /// Next unused token without claiming it.
    ///
    /// Advisory: a concurrent claim may take it immediately. Never treat
    /// the result as reserved.
    pub fn peek_next(&self) -> Result<Option<String>, PoolError> {
        Ok(self.store.peek_next()?)
    }

    pub fn stats(&self) -> Result<PoolStats, PoolError> {
        let counts = self.store.counts()?;
        Ok(PoolStats::from_counts(counts.total, counts.used))
    }

    /// Marks every seed unused. Refused in production.
    pub fn reset_all(&self) -> Result<usize, PoolError> {
        if self.config.environment == Environment::Production {
            tracing::warn!("Refused seed pool reset in production");
            return Err(PoolError::ResetForbidden);
        }
        let reset = self.store.reset_all()?;
        tracing::warn!(reset, environment = ?self.config.environment, "Seed pool reset");
        Ok(reset)
    }
}
