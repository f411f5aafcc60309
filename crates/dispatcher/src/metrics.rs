//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Counters shared by all ticks of one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Ticks fired by the schedule
    ticks: AtomicU64,
    /// Ticks currently running
    in_flight: AtomicUsize,
    /// Answered with 204
    delivered: AtomicU64,
    /// Answered with any other status
    unexpected_status: AtomicU64,
    /// Abandoned before sending
    signing_failures: AtomicU64,
    serialize_failures: AtomicU64,
    /// No response received
    transport_failures: AtomicU64,
    /// Sum and maximum of request round trips (µs)
    round_trip_total_us: AtomicU64,
    round_trip_max_us: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Mark a tick as started, returns the new in-flight count
    pub fn tick_started(&self) -> usize {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.in_flight.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Mark a tick as finished, returns the new in-flight count
    pub fn tick_finished(&self) -> usize {
        self.in_flight.fetch_sub(1, Ordering::Relaxed).saturating_sub(1)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn inc_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unexpected_status(&self) -> u64 {
        self.unexpected_status.load(Ordering::Relaxed)
    }

    pub fn inc_unexpected_status(&self) {
        self.unexpected_status.fetch_add(1, Ordering::Relaxed);
    }

    pub fn signing_failures(&self) -> u64 {
        self.signing_failures.load(Ordering::Relaxed)
    }

    pub fn inc_signing_failures(&self) {
        self.signing_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn serialize_failures(&self) -> u64 {
        self.serialize_failures.load(Ordering::Relaxed)
    }

    pub fn inc_serialize_failures(&self) {
        self.serialize_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transport_failures(&self) -> u64 {
        self.transport_failures.load(Ordering::Relaxed)
    }

    pub fn inc_transport_failures(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one request round trip
    pub fn record_round_trip(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.round_trip_total_us.fetch_add(micros, Ordering::Relaxed);
        self.round_trip_max_us.fetch_max(micros, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks(),
            in_flight: self.in_flight(),
            delivered: self.delivered(),
            unexpected_status: self.unexpected_status(),
            signing_failures: self.signing_failures(),
            serialize_failures: self.serialize_failures(),
            transport_failures: self.transport_failures(),
            round_trip_total: Duration::from_micros(
                self.round_trip_total_us.load(Ordering::Relaxed),
            ),
            round_trip_max: Duration::from_micros(self.round_trip_max_us.load(Ordering::Relaxed)),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub in_flight: usize,
    pub delivered: u64,
    pub unexpected_status: u64,
    pub signing_failures: u64,
    pub serialize_failures: u64,
    pub transport_failures: u64,
    pub round_trip_total: Duration,
    pub round_trip_max: Duration,
}

impl MetricsSnapshot {
    /// Ticks that received a response of any status
    pub fn sent(&self) -> u64 {
        self.delivered + self.unexpected_status
    }

    /// Ticks abandoned before a response
    pub fn failed(&self) -> u64 {
        self.signing_failures + self.serialize_failures + self.transport_failures
    }

    /// Mean round trip over all sent ticks
    pub fn mean_round_trip(&self) -> Option<Duration> {
        let sent = u32::try_from(self.sent()).ok().filter(|n| *n > 0)?;
        Some(self.round_trip_total / sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_tracking() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.tick_started(), 1);
        assert_eq!(metrics.tick_started(), 2);
        assert_eq!(metrics.tick_finished(), 1);
        assert_eq!(metrics.ticks(), 2);
        assert_eq!(metrics.in_flight(), 1);
    }

    #[test]
    fn test_snapshot_totals() {
        let metrics = DispatchMetrics::new();
        metrics.inc_delivered();
        metrics.inc_delivered();
        metrics.inc_unexpected_status();
        metrics.inc_signing_failures();
        metrics.inc_transport_failures();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sent(), 3);
        assert_eq!(snapshot.failed(), 2);
    }

    #[test]
    fn test_round_trip_stats() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.snapshot().mean_round_trip(), None);

        metrics.inc_delivered();
        metrics.record_round_trip(Duration::from_millis(10));
        metrics.inc_delivered();
        metrics.record_round_trip(Duration::from_millis(30));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.mean_round_trip(), Some(Duration::from_millis(20)));
        assert_eq!(snapshot.round_trip_max, Duration::from_millis(30));
    }
}
