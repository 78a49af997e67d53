//! Contract Invariant Tests
//!
//! Determinism of generation and exactly-once allocation from the seed
//! pool under concurrent consumers.

use pixel_forge::{
    generation::{BorderStyle, LogoGenerator},
    prng::Seed,
    seeds::{
        Environment, ExclusiveSeedPool, ForgeLockStatusCache, MemorySeedStore, PoolConfig,
        SeedStore, SnapshotLock, StatusCacheConfig, TOTAL_SEEDS,
    },
    ExclusiveForge,
};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

/// SHA-256 of `generate("Nike", Some(42))` on the default 512x256 canvas.
const NIKE_42_DIGEST: &str = "ab701283a5e422b2965fa89d14206bc5a824c07f8af30ea312743b7607d3310e";
/// SHA-256 of `generate("Nike", None)`, seed 2428021.
const NIKE_TEXT_SEED_DIGEST: &str =
    "0104698e3a1ff744f991c7c3d65cd36cb34e1503dfe7c63a90fb197f75553363";

fn pool_of(total: usize) -> ExclusiveSeedPool {
    let pool = ExclusiveSeedPool::new(
        MemorySeedStore::new(),
        PoolConfig {
            total,
            ..Default::default()
        },
    );
    pool.initialize().unwrap();
    pool
}

/// Runs `consumers` threads that each claim once, all released together.
fn race(pool: &ExclusiveSeedPool, consumers: usize) -> Vec<Option<String>> {
    let barrier = Barrier::new(consumers);
    thread::scope(|s| {
        let handles: Vec<_> = (0..consumers)
            .map(|i| {
                let barrier = &barrier;
                s.spawn(move || {
                    let consumer = format!("consumer-{i}");
                    barrier.wait();
                    pool.consume_next(Some(consumer.as_str())).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn invariant_generation_is_reproducible() {
    let a = LogoGenerator::default().generate("Nike", Some(42)).unwrap();
    let b = LogoGenerator::default().generate("Nike", Some(42)).unwrap();

    assert_eq!(a.config.palette_index, 6);
    assert_eq!(a.config.palette_name, "amber");
    assert_eq!(a.config.border_style, BorderStyle::Beveled);
    assert_eq!(a.config.pixel_size, 8);
    assert_eq!(a.artifact.width(), 512);
    assert_eq!(a.artifact.height(), 256);
    assert_eq!(a.digest(), NIKE_42_DIGEST);
    assert_eq!(b.digest(), NIKE_42_DIGEST);
    assert_eq!(a.artifact.pixels(), b.artifact.pixels());
}

#[test]
fn invariant_text_seed_matches_explicit_seed() {
    let gen = LogoGenerator::default();
    let derived = gen.generate("  Nike  ", None).unwrap();
    assert_eq!(derived.seed_used, Seed::from_text("Nike"));
    assert_eq!(derived.seed_used.value(), 2_428_021);

    let explicit = gen.generate("Nike", Some(2_428_021)).unwrap();
    assert_eq!(derived.digest(), NIKE_TEXT_SEED_DIGEST);
    assert_eq!(explicit.digest(), NIKE_TEXT_SEED_DIGEST);
}

#[test]
fn invariant_different_seeds_differ() {
    let gen = LogoGenerator::default();
    let a = gen.generate("Pixel", Some(1)).unwrap();
    let b = gen.generate("Pixel", Some(2)).unwrap();
    assert_ne!(a.digest(), b.digest());
}

#[test]
fn invariant_three_tokens_five_consumers() {
    let pool = pool_of(3);
    let results = race(&pool, 5);

    let claimed: Vec<String> = results.iter().flatten().cloned().collect();
    let unique: HashSet<&String> = claimed.iter().collect();
    assert_eq!(claimed.len(), 3);
    assert_eq!(unique.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_none()).count(), 2);
}

#[test]
fn invariant_at_most_once_under_contention() {
    for (tokens, consumers) in [(1, 8), (10, 16), (50, 64), (64, 64)] {
        let pool = pool_of(tokens);
        let results = race(&pool, consumers);

        let claimed: Vec<&String> = results.iter().flatten().collect();
        let unique: HashSet<&String> = claimed.iter().copied().collect();
        assert_eq!(claimed.len(), tokens.min(consumers), "{tokens} tokens, {consumers} consumers");
        assert_eq!(unique.len(), claimed.len());

        let stats = pool.stats().unwrap();
        assert_eq!(stats.used, claimed.len());
        for token in claimed {
            assert!(pool.store().get(token).unwrap().unwrap().used);
        }
    }
}

#[test]
fn invariant_exhaustion_persists() {
    let pool = pool_of(2);
    pool.consume_next(None).unwrap().unwrap();
    pool.consume_next(None).unwrap().unwrap();
    for _ in 0..10 {
        assert!(pool.consume_next(None).unwrap().is_none());
    }
    assert!(race(&pool, 8).iter().all(Option::is_none));
    assert_eq!(pool.stats().unwrap().available, 0);
}

#[test]
fn invariant_initialize_is_idempotent() {
    let pool = ExclusiveSeedPool::new(MemorySeedStore::new(), PoolConfig::default());
    for _ in 0..3 {
        pool.initialize().unwrap();
    }
    assert_eq!(pool.stats().unwrap().total, TOTAL_SEEDS);
    let unique: HashSet<String> = pool.store().tokens().unwrap().into_iter().collect();
    assert_eq!(unique.len(), TOTAL_SEEDS);
}

#[test]
fn invariant_snapshot_keeps_claims_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool.json");

    let first = pool_of(4);
    let claimed = first.consume_next(Some("early")).unwrap().unwrap();
    first.store().persist(&path).unwrap();

    let reopened = ExclusiveSeedPool::new(
        MemorySeedStore::open(&path).unwrap(),
        PoolConfig {
            total: 4,
            environment: Environment::Production,
            ..Default::default()
        },
    );
    assert_eq!(reopened.initialize().unwrap().inserted, 0);
    let record = reopened.store().get(&claimed).unwrap().unwrap();
    assert_eq!(record.used_by.as_deref(), Some("early"));

    let rest: HashSet<String> = (0..3)
        .map(|_| reopened.consume_next(None).unwrap().unwrap())
        .collect();
    assert!(!rest.contains(&claimed));
    assert!(reopened.consume_next(None).unwrap().is_none());
    assert!(reopened.reset_all().is_err());
}

#[test]
fn invariant_locked_snapshot_sessions_allocate_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool.json");
    pool_of(4).store().persist(&path).unwrap();

    // each session mirrors one CLI run: lock, load, claim, persist
    let barrier = Barrier::new(6);
    let results: Vec<Option<String>> = thread::scope(|s| {
        let handles: Vec<_> = (0..6)
            .map(|i| {
                let (path, barrier) = (&path, &barrier);
                s.spawn(move || {
                    barrier.wait();
                    let _lock = SnapshotLock::exclusive(path).unwrap();
                    let pool = ExclusiveSeedPool::new(
                        MemorySeedStore::open(path).unwrap(),
                        PoolConfig {
                            total: 4,
                            ..Default::default()
                        },
                    );
                    let consumer = format!("session-{i}");
                    let token = pool.consume_next(Some(consumer.as_str())).unwrap();
                    pool.store().persist(path).unwrap();
                    token
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let claimed: HashSet<String> = results.iter().flatten().cloned().collect();
    assert_eq!(claimed.len(), 4);
    assert_eq!(results.iter().filter(|r| r.is_none()).count(), 2);

    let reloaded = MemorySeedStore::load(&path).unwrap();
    assert_eq!(reloaded.counts().unwrap().used, 4);
    for token in &claimed {
        assert!(reloaded.get(token).unwrap().unwrap().used_by.is_some());
    }
}

#[test]
fn invariant_concurrent_forging_spends_each_seed_once() {
    let pool = Arc::new(pool_of(5));
    let status = Arc::new(ForgeLockStatusCache::new(
        Arc::clone(&pool),
        StatusCacheConfig::default(),
    ));
    let forge = ExclusiveForge::new(LogoGenerator::default(), status);

    let barrier = Barrier::new(8);
    let outcomes: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (forge, barrier) = (&forge, &barrier);
                s.spawn(move || {
                    barrier.wait();
                    forge.forge_exclusive("Rush", None)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let tokens: HashSet<String> = outcomes
        .iter()
        .filter_map(|r| r.as_ref().ok().and_then(|o| o.as_ref()))
        .map(|logo| logo.token.clone())
        .collect();
    assert_eq!(tokens.len(), 5);
    assert_eq!(pool.stats().unwrap().used, 5);

    let counters = forge.counters();
    assert_eq!(counters.forged, 5);
    assert_eq!(counters.forged + counters.refused + counters.exhausted, 8);
}
