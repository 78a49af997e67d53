//! Exclusive seed pool.
//!
//! A fixed number of random tokens is minted once. Each token can be
//! claimed exactly once, no matter how many callers race for it, and
//! the pool locks the forge when the last token is gone.

mod lock;
mod memory;
mod pool;
mod status;
mod store;
mod token;

pub use lock::SnapshotLock;
pub use memory::MemorySeedStore;
pub use pool::{
    Environment, ExclusiveSeedPool, InitReport, PoolConfig, PoolError, PoolStats, TOTAL_SEEDS,
};
pub use status::{ForgeLockStatus, ForgeLockStatusCache, LockLevel, StatusCacheConfig};
pub use store::{SeedRecord, SeedStore, StoreCounts, StoreError};
pub use token::{generate_unique, random_token, BudgetExhausted, TOKEN_BYTES};
