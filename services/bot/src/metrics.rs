use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// Settlement is an in-memory apply plus a snapshot write; anything past a
// quarter second is an outlier worth counting, not bucketing.
const SETTLE_BUCKET_COUNT: usize = 8;
const SETTLE_BUCKETS_MS: [u64; SETTLE_BUCKET_COUNT] = [1, 2, 5, 10, 25, 50, 100, 250];

/// Point-in-time view of one latency histogram.
#[derive(Clone, Debug, Serialize)]
pub struct LatencySnapshot {
    pub buckets_ms: Vec<u64>,
    pub counts: Vec<u64>,
    pub overflow: u64,
    pub count: u64,
    pub avg_ms: f64,
    pub max_ms: u64,
}

#[derive(Default)]
struct LatencyMetrics {
    buckets: [AtomicU64; SETTLE_BUCKET_COUNT],
    overflow: AtomicU64,
    count: AtomicU64,
    total_ms: AtomicU64,
    max_ms: AtomicU64,
}

impl LatencyMetrics {
    fn record(&self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ms.fetch_add(ms, Ordering::Relaxed);
        self.max_ms.fetch_max(ms, Ordering::Relaxed);
        match SETTLE_BUCKETS_MS.iter().position(|bucket| ms <= *bucket) {
            Some(idx) => self.buckets[idx].fetch_add(1, Ordering::Relaxed),
            None => self.overflow.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn snapshot(&self) -> LatencySnapshot {
        let count = self.count.load(Ordering::Relaxed);
        let total_ms = self.total_ms.load(Ordering::Relaxed);
        LatencySnapshot {
            buckets_ms: SETTLE_BUCKETS_MS.to_vec(),
            counts: self
                .buckets
                .iter()
                .map(|bucket| bucket.load(Ordering::Relaxed))
                .collect(),
            overflow: self.overflow.load(Ordering::Relaxed),
            count,
            avg_ms: if count > 0 {
                total_ms as f64 / count as f64
            } else {
                0.0
            },
            max_ms: self.max_ms.load(Ordering::Relaxed),
        }
    }
}

/// Counters and latency for the settlement path, exposed at `/metrics`.
///
/// A rejected command is one that settled to a failure event; store faults are
/// errors out of the ledger or snapshot writer, which the handler surfaces as
/// HTTP 500s.
#[derive(Default)]
pub struct Metrics {
    commands_applied: AtomicU64,
    commands_rejected: AtomicU64,
    store_faults: AtomicU64,
    sessions_expired: AtomicU64,
    settle: LatencyMetrics,
}

#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub commands_applied: u64,
    pub commands_rejected: u64,
    pub store_faults: u64,
    pub sessions_expired: u64,
    pub settle: LatencySnapshot,
}

impl Metrics {
    pub fn record_command(&self, duration: Duration, rejected: bool) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
        if rejected {
            self.commands_rejected.fetch_add(1, Ordering::Relaxed);
        }
        self.settle.record(duration);
    }

    pub fn record_store_fault(&self) {
        self.store_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self, sessions: u64) {
        self.sessions_expired.fetch_add(sessions, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            store_faults: self.store_faults.load(Ordering::Relaxed),
            sessions_expired: self.sessions_expired.load(Ordering::Relaxed),
            settle: self.settle.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_counters_and_histogram() {
        let metrics = Metrics::default();
        metrics.record_command(Duration::from_millis(3), false);
        metrics.record_command(Duration::from_millis(40), true);
        metrics.record_command(Duration::from_millis(999), false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.commands_applied, 3);
        assert_eq!(snapshot.commands_rejected, 1);
        assert_eq!(snapshot.settle.count, 3);
        assert_eq!(snapshot.settle.overflow, 1);
        assert_eq!(snapshot.settle.max_ms, 999);
        // 3ms lands in the <=5 bucket, 40ms in the <=50 bucket.
        assert_eq!(snapshot.settle.counts[2], 1);
        assert_eq!(snapshot.settle.counts[5], 1);
    }

    #[test]
    fn test_expiry_and_fault_counters() {
        let metrics = Metrics::default();
        metrics.record_expired(2);
        metrics.record_expired(1);
        metrics.record_store_fault();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sessions_expired, 3);
        assert_eq!(snapshot.store_faults, 1);
        assert_eq!(snapshot.commands_applied, 0);
        assert_eq!(snapshot.settle.avg_ms, 0.0);
    }
}
