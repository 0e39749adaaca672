//! Subscriber and dispatcher counters for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for a single subscriber
#[derive(Debug, Default)]
pub struct SubscriberMetrics {
    /// Current pending queue length
    pending_len: AtomicUsize,
    /// Messages rendered immediately
    real_time_count: AtomicU64,
    /// Messages queued while offline
    stored_count: AtomicU64,
    /// Messages rendered by a flush
    flushed_count: AtomicU64,
    /// Render failures
    failure_count: AtomicU64,
    /// Messages lost to the overflow policy
    dropped_count: AtomicU64,
}

impl SubscriberMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_len(&self) -> usize {
        self.pending_len.load(Ordering::Relaxed)
    }

    pub fn set_pending_len(&self, len: usize) {
        self.pending_len.store(len, Ordering::Relaxed);
    }

    pub fn real_time_count(&self) -> u64 {
        self.real_time_count.load(Ordering::Relaxed)
    }

    pub fn inc_real_time_count(&self) {
        self.real_time_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stored_count(&self) -> u64 {
        self.stored_count.load(Ordering::Relaxed)
    }

    pub fn inc_stored_count(&self) {
        self.stored_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn flushed_count(&self) -> u64 {
        self.flushed_count.load(Ordering::Relaxed)
    }

    pub fn inc_flushed_count(&self) {
        self.flushed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> SubscriberMetricsSnapshot {
        SubscriberMetricsSnapshot {
            pending_len: self.pending_len(),
            real_time_count: self.real_time_count(),
            stored_count: self.stored_count(),
            flushed_count: self.flushed_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
        }
    }
}

/// Snapshot of subscriber metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriberMetricsSnapshot {
    pub pending_len: usize,
    pub real_time_count: u64,
    pub stored_count: u64,
    pub flushed_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
}

/// Metrics for the dispatcher fan-out
#[derive(Debug, Default)]
pub struct DispatcherMetrics {
    broadcast_count: AtomicU64,
    attempt_count: AtomicU64,
    failure_count: AtomicU64,
}

impl DispatcherMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broadcast_count(&self) -> u64 {
        self.broadcast_count.load(Ordering::Relaxed)
    }

    pub fn inc_broadcast_count(&self) {
        self.broadcast_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn attempt_count(&self) -> u64 {
        self.attempt_count.load(Ordering::Relaxed)
    }

    pub fn inc_attempt_count(&self) {
        self.attempt_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherMetricsSnapshot {
        DispatcherMetricsSnapshot {
            broadcast_count: self.broadcast_count(),
            attempt_count: self.attempt_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of dispatcher metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherMetricsSnapshot {
    pub broadcast_count: u64,
    pub attempt_count: u64,
    pub failure_count: u64,
}
