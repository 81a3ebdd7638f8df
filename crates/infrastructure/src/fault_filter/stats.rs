//! Fault-injection statistics
//!
//! Counters are updated lock-free from concurrent calls. Each update is
//! mirrored to the `metrics` facade with the method as a label.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const CALLS: &str = "fault_injection_calls_total";
const DELAYS: &str = "fault_injection_delays_total";
const ABORTS: &str = "fault_injection_aborts_total";
const CAPACITY_SKIPS: &str = "fault_injection_capacity_skips_total";

/// Point-in-time copy of [`FilterStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStatsSnapshot {
    /// Calls that went through the filter
    pub total_calls: u64,
    /// Calls that had a policy and therefore a session
    pub sessions: u64,
    /// Delays injected
    pub delays_injected: u64,
    /// Aborts injected
    pub aborts_injected: u64,
    /// Faults requested by the dice but refused by the max-faults ceiling
    pub capacity_skips: u64,
    /// Total delay added (milliseconds)
    pub total_delay_ms: u64,
}

impl FilterStatsSnapshot {
    /// Share of calls that received a delay or an abort
    #[allow(clippy::cast_precision_loss)]
    pub fn actual_fault_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            (self.delays_injected + self.aborts_injected) as f64 / self.total_calls as f64
        }
    }
}

/// Running statistics of a [`FaultInjectionFilter`](super::FaultInjectionFilter)
#[derive(Debug, Default)]
pub struct FilterStats {
    total_calls: AtomicU64,
    sessions: AtomicU64,
    delays_injected: AtomicU64,
    aborts_injected: AtomicU64,
    capacity_skips: AtomicU64,
    total_delay_ms: AtomicU64,
}

impl FilterStats {
    pub const fn new() -> Self {
        Self {
            total_calls: AtomicU64::new(0),
            sessions: AtomicU64::new(0),
            delays_injected: AtomicU64::new(0),
            aborts_injected: AtomicU64::new(0),
            capacity_skips: AtomicU64::new(0),
            total_delay_ms: AtomicU64::new(0),
        }
    }

    /// Record a call entering the filter
    pub fn record_call(&self, method: &str, has_policy: bool) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        if has_policy {
            self.sessions.fetch_add(1, Ordering::Relaxed);
        }
        metrics::counter!(CALLS, "method" => method.to_owned()).increment(1);
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn record_delay(&self, method: &str, delay: Duration) {
        self.delays_injected.fetch_add(1, Ordering::Relaxed);
        self.total_delay_ms
            .fetch_add(delay.as_millis() as u64, Ordering::Relaxed);
        metrics::counter!(DELAYS, "method" => method.to_owned()).increment(1);
    }

    pub fn record_abort(&self, method: &str) {
        self.aborts_injected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(ABORTS, "method" => method.to_owned()).increment(1);
    }

    /// Record faults the ceiling refused (`count` is 1 or 2 per call)
    pub fn record_capacity_skips(&self, method: &str, count: u64) {
        if count == 0 {
            return;
        }
        self.capacity_skips.fetch_add(count, Ordering::Relaxed);
        metrics::counter!(CAPACITY_SKIPS, "method" => method.to_owned()).increment(count);
    }

    pub fn snapshot(&self) -> FilterStatsSnapshot {
        FilterStatsSnapshot {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            sessions: self.sessions.load(Ordering::Relaxed),
            delays_injected: self.delays_injected.load(Ordering::Relaxed),
            aborts_injected: self.aborts_injected.load(Ordering::Relaxed),
            capacity_skips: self.capacity_skips.load(Ordering::Relaxed),
            total_delay_ms: self.total_delay_ms.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        for counter in [
            &self.total_calls,
            &self.sessions,
            &self.delays_injected,
            &self.aborts_injected,
            &self.capacity_skips,
            &self.total_delay_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
