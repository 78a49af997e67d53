//! Gated ("exclusive") generation.
//!
//! Every exclusive logo spends one pool token. The token, not the text,
//! decides the seed, so two callers forging the same text still get
//! different logos, and nobody can forge a given token twice.

use crate::fingerprint::{FingerprintClassifier, StyleFingerprint};
use crate::generation::{validate_text, Artifact, GeneratedLogo, GenerationError, LogoGenerator};
use crate::prng::{EntropySource, Seed};
use crate::rarity::{apply_effects, RarityAssigner, RarityRoll};
use crate::seeds::{
    ExclusiveSeedPool, ForgeLockStatus, ForgeLockStatusCache, MemorySeedStore, PoolError, SeedStore,
};
use rand_core::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors from the gated mode.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// One gated-mode result.
#[derive(Debug, Clone)]
pub struct ExclusiveLogo {
    /// The pool token spent on this logo.
    pub token: String,
    /// Base artifact, seeded from the token.
    pub logo: GeneratedLogo,
    pub fingerprint: StyleFingerprint,
    pub rarity: RarityRoll,
    /// Base artifact with the tier's filter stages applied.
    pub display: Artifact,
}

/// Point-in-time copy of the forge counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForgeCounters {
    /// Logos forged.
    pub forged: u64,
    /// Requests turned away because the status cache reported a lock.
    pub refused: u64,
    /// Requests that passed the lock check but found the pool empty.
    pub exhausted: u64,
}

#[derive(Debug, Default)]
struct Counters {
    forged: AtomicU64,
    refused: AtomicU64,
    exhausted: AtomicU64,
}

/// Ties the pool, the status cache and the generators together.
pub struct ExclusiveForge<S: SeedStore = MemorySeedStore> {
    generator: LogoGenerator,
    pool: Arc<ExclusiveSeedPool<S>>,
    status: Arc<ForgeLockStatusCache<S>>,
    classifier: FingerprintClassifier,
    rarity: RarityAssigner,
    counters: Counters,
}

impl<S: SeedStore> ExclusiveForge<S> {
    pub fn new(generator: LogoGenerator, status: Arc<ForgeLockStatusCache<S>>) -> Self {
        Self {
            generator,
            pool: Arc::clone(status.pool()),
            status,
            classifier: FingerprintClassifier::new(),
            rarity: RarityAssigner::new(),
            counters: Counters::default(),
        }
    }

    pub fn pool(&self) -> &Arc<ExclusiveSeedPool<S>> {
        &self.pool
    }

    pub fn status(&self) -> Result<ForgeLockStatus, PoolError> {
        self.status.status()
    }

    pub fn counters(&self) -> ForgeCounters {
        ForgeCounters {
            forged: self.counters.forged.load(Ordering::Relaxed),
            refused: self.counters.refused.load(Ordering::Relaxed),
            exhausted: self.counters.exhausted.load(Ordering::Relaxed),
        }
    }

    /// Forges one exclusive logo.
    ///
    /// Returns `Err(PoolError::ForgeLocked)` when the cached status says
    /// the pool is exhausted, and `Ok(None)` when the cache was stale and
    /// the claim itself found nothing left.
    pub fn forge_exclusive(
        &self,
        text: &str,
        consumer_id: Option<&str>,
    ) -> Result<Option<ExclusiveLogo>, ForgeError> {
        self.forge_exclusive_with(text, consumer_id, &mut EntropySource::from_os_entropy())
    }

    /// [`forge_exclusive`](Self::forge_exclusive) with a caller-supplied
    /// source for the fingerprint and rarity draws.
    pub fn forge_exclusive_with<R: RngCore + ?Sized>(
        &self,
        text: &str,
        consumer_id: Option<&str>,
        rng: &mut R,
    ) -> Result<Option<ExclusiveLogo>, ForgeError> {
        let text = validate_text(text)?;

        if let Err(e) = self.status.enforce_not_locked() {
            if matches!(e, PoolError::ForgeLocked { .. }) {
                self.counters.refused.fetch_add(1, Ordering::Relaxed);
            }
            return Err(e.into());
        }

        let claimed = self.pool.consume_next(consumer_id)?;
        self.status.invalidate();
        let Some(token) = claimed else {
            self.counters.exhausted.fetch_add(1, Ordering::Relaxed);
            tracing::info!("Forge status was stale, pool already exhausted");
            return Ok(None);
        };

        let seed = Seed::from_token(&token);
        let logo = self.generator.generate_with_seed(text, seed);
        let fingerprint = self.classifier.generate_enforced_with(rng);
        let rarity = self.rarity.roll_exclusive_with(rng);
        let display = apply_effects(&logo.artifact, rarity.tier);

        self.counters.forged.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            seed = seed.value(),
            tier = %rarity.tier,
            palette = %fingerprint.palette,
            consumer = consumer_id.unwrap_or("-"),
            "Forged exclusive logo"
        );

        Ok(Some(ExclusiveLogo {
            token,
            logo,
            fingerprint,
            rarity,
            display,
        }))
    }
}
