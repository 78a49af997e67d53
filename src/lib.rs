//! Pixel Forge Library
//!
//! Deterministic pixel-art logo generation, plus a hard-capped pool of
//! single-use "exclusive seeds" gating a limited generation mode.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! text + seed → prng → generation → artifact
//!                                      ↓
//!                 fingerprint + rarity (display only)
//!
//! seeds (pool → status cache) → forge (token → seed → generation)
//! ```
//!
//! # Design Principles
//!
//! - **Reproducible**: the same text, seed and canvas give a byte-identical artifact
//! - **Exactly-once**: every pool token is claimed at most once, under any contention
//! - **Exhaustion is not an error**: an empty pool yields `None`
//! - **Display-only randomness**: fingerprints and rarity never touch the base pixels
//!
//! # Example
//!
//! ```no_run
//! use pixel_forge::{
//!     generation::LogoGenerator,
//!     seeds::{ExclusiveSeedPool, MemorySeedStore, PoolConfig},
//! };
//!
//! let generator = LogoGenerator::default();
//! let logo = generator.generate("Nike", Some(42)).unwrap();
//! println!("{} {}", logo.config.palette_name, logo.digest());
//!
//! let pool = ExclusiveSeedPool::new(MemorySeedStore::new(), PoolConfig::default());
//! pool.initialize().unwrap();
//! if let Some(token) = pool.consume_next(Some("user-1")).unwrap() {
//!     println!("claimed {token}");
//! }
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod fingerprint;
pub mod forge;
pub mod generation;
pub mod metrics;
pub mod prng;
pub mod rarity;
pub mod seeds;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FileConfig};
pub use fingerprint::{FingerprintClassifier, StyleFingerprint};
pub use forge::{ExclusiveForge, ExclusiveLogo, ForgeError};
pub use generation::{Artifact, GeneratedLogo, GenerationConfig, GenerationError, LogoGenerator};
pub use prng::{Seed, SeededRng};
pub use rarity::{RarityAssigner, RarityTier};
pub use seeds::{ExclusiveSeedPool, ForgeLockStatusCache, MemorySeedStore, PoolError, SeedStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
