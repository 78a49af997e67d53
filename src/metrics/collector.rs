//! Metrics collection and registry.

use crate::seeds::{ForgeLockStatus, LockLevel};
use prometheus::{Encoder, Gauge, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pool state for metrics update.
///
/// Everything here is read back from the persisted pool, so any process
/// can export it.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Seeds minted.
    pub total_seeds: usize,
    /// Seeds claimed.
    pub used_seeds: usize,
    /// Seeds left.
    pub available_seeds: usize,
    /// Share of the pool claimed, in percent.
    pub percentage_used: f64,
    /// Whether the forge is locked.
    pub is_locked: bool,
    /// Whether fewer seeds than the critical threshold remain.
    pub is_critical: bool,
}

/// Prometheus metrics registry for the forge.
pub struct MetricsRegistry {
    registry: Registry,

    // Pool metrics
    total_seeds: IntGauge,
    used_seeds: IntGauge,
    available_seeds: IntGauge,
    percentage_used: Gauge,

    // Lock metrics
    locked: IntGauge,
    critical: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all forge metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let total_seeds = IntGauge::new(
            "pixel_forge_pool_total_seeds",
            "Number of exclusive seeds minted",
        )?;
        let used_seeds = IntGauge::new(
            "pixel_forge_pool_used_seeds",
            "Number of exclusive seeds claimed",
        )?;
        let available_seeds = IntGauge::new(
            "pixel_forge_pool_available_seeds",
            "Number of exclusive seeds left",
        )?;
        let percentage_used = Gauge::new(
            "pixel_forge_pool_percentage_used",
            "Percentage of the seed pool claimed",
        )?;

        let locked = IntGauge::new(
            "pixel_forge_locked",
            "Forge lock state (1=locked, 0=open)",
        )?;
        let critical = IntGauge::new(
            "pixel_forge_critical",
            "Seed pool below the critical threshold (1=yes, 0=no)",
        )?;

        registry.register(Box::new(total_seeds.clone()))?;
        registry.register(Box::new(used_seeds.clone()))?;
        registry.register(Box::new(available_seeds.clone()))?;
        registry.register(Box::new(percentage_used.clone()))?;
        registry.register(Box::new(locked.clone()))?;
        registry.register(Box::new(critical.clone()))?;

        Ok(Self {
            registry,
            total_seeds,
            used_seeds,
            available_seeds,
            percentage_used,
            locked,
            critical,
        })
    }

    /// Updates all metrics from a snapshot of pool state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.total_seeds.set(snapshot.total_seeds as i64);
        self.used_seeds.set(snapshot.used_seeds as i64);
        self.available_seeds.set(snapshot.available_seeds as i64);
        self.percentage_used.set(snapshot.percentage_used);

        self.locked.set(i64::from(snapshot.is_locked));
        self.critical.set(i64::from(snapshot.is_critical));
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from a computed lock status.
    pub fn from_status(status: &ForgeLockStatus) -> Self {
        Self {
            total_seeds: status.total_seeds,
            used_seeds: status.used_seeds,
            available_seeds: status.available_seeds,
            percentage_used: status.percentage_used,
            is_locked: status.is_locked,
            is_critical: status.level == LockLevel::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::PoolStats;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();
        let status = ForgeLockStatus::from_stats(PoolStats::from_counts(9000, 8950), 100);

        registry.update(&MetricsSnapshot::from_status(&status));

        let output = registry.encode().unwrap();
        assert!(output.contains("pixel_forge_pool_available_seeds 50"));
        assert!(output.contains("pixel_forge_pool_used_seeds 8950"));
        assert!(output.contains("pixel_forge_critical 1"));
        assert!(output.contains("pixel_forge_locked 0"));
    }

    #[test]
    fn test_exhausted_pool_reports_locked() {
        let registry = MetricsRegistry::new().unwrap();
        let status = ForgeLockStatus::from_stats(PoolStats::from_counts(9000, 9000), 100);
        registry.update(&MetricsSnapshot::from_status(&status));

        let output = registry.encode().unwrap();
        assert!(output.contains("pixel_forge_locked 1"));
        assert!(output.contains("pixel_forge_critical 0"));
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        assert!(output.contains("pixel_forge_pool_total_seeds"));
        assert!(output.contains("pixel_forge_locked"));
        assert!(!output.contains("pixel_forge_forged_total"));
    }
}
