// Sync metrics module
//
// Lightweight counters for the background synchronizer and remote sync agent

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Settings sync metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Logged on shutdown of the background synchronizer.
#[derive(Debug)]
pub struct Metrics {
    /// Poll ticks executed by the background synchronizer
    pub ticks: AtomicU64,

    /// Drift checks that found in-memory changes and persisted them
    pub drift_repairs: AtomicU64,

    /// Settings file writes that failed
    pub persist_failures: AtomicU64,

    /// Remote sync attempts (at most one per context)
    pub remote_attempts: AtomicU64,

    /// Remote syncs that completed (in sync or adopted)
    pub remote_successes: AtomicU64,

    /// Remote documents adopted into the store
    pub remote_adoptions: AtomicU64,

    /// Total time spent in remote sync in milliseconds
    pub total_remote_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            drift_repairs: AtomicU64::new(0),
            persist_failures: AtomicU64::new(0),
            remote_attempts: AtomicU64::new(0),
            remote_successes: AtomicU64::new(0),
            remote_adoptions: AtomicU64::new(0),
            total_remote_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_drift_repair(&self) {
        self.drift_repairs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a remote sync attempt and how long it took
    pub fn record_remote_attempt(&self, succeeded: bool, duration: Duration) {
        self.remote_attempts.fetch_add(1, Ordering::Relaxed);
        if succeeded {
            self.remote_successes.fetch_add(1, Ordering::Relaxed);
        }
        self.total_remote_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_remote_adoption(&self) {
        self.remote_adoptions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Settings Sync Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Ticks: {}, drift repairs: {}, persist failures: {}",
            self.ticks.load(Ordering::Relaxed),
            self.drift_repairs.load(Ordering::Relaxed),
            self.persist_failures.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Remote sync: {} attempted, {} succeeded, {} adopted ({}ms)",
            self.remote_attempts.load(Ordering::Relaxed),
            self.remote_successes.load(Ordering::Relaxed),
            self.remote_adoptions.load(Ordering::Relaxed),
            self.total_remote_time_ms.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
