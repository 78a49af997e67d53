//! Prometheus metrics exporter for the forge.
//!
//! This module exposes the persisted seed pool state in Prometheus
//! format, optionally over HTTP (feature `metrics`).
//!
//! # Metrics Exposed
//!
//! ## Pool Metrics
//! - `pixel_forge_pool_total_seeds` - Seeds minted
//! - `pixel_forge_pool_used_seeds` - Seeds claimed
//! - `pixel_forge_pool_available_seeds` - Seeds left
//! - `pixel_forge_pool_percentage_used` - Share of the pool claimed
//!
//! ## Lock Metrics
//! - `pixel_forge_locked` - Forge lock state (1=locked, 0=open)
//! - `pixel_forge_critical` - Pool below the critical threshold
//!
//! # Example
//!
//! ```no_run
//! use pixel_forge::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     total_seeds: 9000,
//!     used_seeds: 120,
//!     available_seeds: 8880,
//!     percentage_used: 1.33,
//!     ..Default::default()
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
