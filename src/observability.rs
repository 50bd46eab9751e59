//! Gateway counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    snapshots_captured: AtomicU64,
    snapshots_failed: AtomicU64,
    files_served: AtomicU64,
    paths_rejected: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot_captured(&self) {
        self.snapshots_captured.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "snapshots_captured", "Metric incremented");
    }

    pub fn snapshot_failed(&self) {
        self.snapshots_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "snapshots_failed", "Metric incremented");
    }

    pub fn file_served(&self) {
        self.files_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "files_served", "Metric incremented");
    }

    pub fn path_rejected(&self) {
        self.paths_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "paths_rejected", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            snapshots_captured: self.snapshots_captured.load(Ordering::Relaxed),
            snapshots_failed: self.snapshots_failed.load(Ordering::Relaxed),
            files_served: self.files_served.load(Ordering::Relaxed),
            paths_rejected: self.paths_rejected.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub snapshots_captured: u64,
    pub snapshots_failed: u64,
    pub files_served: u64,
    pub paths_rejected: u64,
}
