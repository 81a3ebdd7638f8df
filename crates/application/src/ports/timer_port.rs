//! Timer port
//!
//! Scheduling capability consumed by the fault-injection session to resume
//! a delayed call. The engine never sleeps or spawns on its own; the reactor
//! behind this port owns the clock and fires callbacks.

use std::time::Instant;

/// Callback run when a scheduled timer fires
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wrap a reactor-specific timer id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The reactor-specific timer id
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Port for scheduling deferred callbacks
pub trait TimerPort: Send + Sync {
    /// Current time as seen by the reactor
    fn now(&self) -> Instant;

    /// Run `callback` once `deadline` has passed
    fn schedule(&self, deadline: Instant, callback: TimerCallback) -> TimerHandle;

    /// Cancel a pending timer; the callback is dropped without running.
    ///
    /// Cancelling a timer that already fired, or an unknown handle, is a
    /// no-op.
    fn cancel(&self, handle: TimerHandle);
}
