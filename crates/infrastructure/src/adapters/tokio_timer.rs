//! Timer port backed by the tokio runtime
//!
//! Each scheduled callback is a spawned task sleeping until its deadline.
//! Cancelling removes the task from the pending table and aborts it; the
//! task itself only runs its callback if it still finds its entry, so a
//! callback fires at most once and never after `cancel` returned.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use application::ports::{TimerCallback, TimerHandle, TimerPort};
use parking_lot::Mutex;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Debug, Default)]
struct PendingTimers {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

/// Tokio-backed implementation of [`TimerPort`]
#[derive(Debug, Clone)]
pub struct TokioTimer {
    runtime: Handle,
    pending: Arc<PendingTimers>,
}

impl TokioTimer {
    /// Create a timer that spawns onto the given runtime
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: Arc::new(PendingTimers::default()),
        }
    }

    /// Create a timer bound to the runtime of the calling context
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn try_current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Number of timers scheduled and neither fired nor cancelled
    pub fn pending(&self) -> usize {
        self.pending.tasks.lock().len()
    }
}

impl TimerPort for TokioTimer {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn schedule(&self, deadline: Instant, callback: TimerCallback) -> TimerHandle {
        let id = self.pending.next_id.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);

        // Held across spawn so the task cannot look for its entry before it exists
        let mut tasks = self.pending.tasks.lock();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            let armed = pending.tasks.lock().remove(&id).is_some();
            if armed {
                trace!(timer_id = id, "Timer fired");
                callback();
            }
        });
        tasks.insert(id, task);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let task = self.pending.tasks.lock().remove(&handle.id());
        if let Some(task) = task {
            trace!(timer_id = handle.id(), "Timer cancelled");
            task.abort();
        }
    }
}
