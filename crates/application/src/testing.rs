//! Test doubles for the application ports

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::ports::{TimerCallback, TimerHandle, TimerPort};

struct Pending {
    handle: TimerHandle,
    deadline: Instant,
    callback: TimerCallback,
}

/// Timer driven by hand: time only moves on `advance`
pub struct ManualTimer {
    now: Mutex<Instant>,
    next_id: Mutex<u64>,
    pending: Mutex<Vec<Pending>>,
    cancelled: Mutex<Vec<TimerHandle>>,
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTimer")
            .field("pending", &self.pending.lock().len())
            .field("cancelled", &self.cancelled.lock().len())
            .finish()
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimer {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
            next_id: Mutex::new(0),
            pending: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    /// Move time forward and fire every timer whose deadline has passed
    pub fn advance(&self, by: Duration) {
        let now = {
            let mut now = self.now.lock();
            *now += by;
            *now
        };
        let due: Vec<Pending> = {
            let mut pending = self.pending.lock();
            let (due, keep): (Vec<Pending>, Vec<Pending>) =
                pending.drain(..).partition(|p| p.deadline <= now);
            *pending = keep;
            due
        };
        for p in due {
            (p.callback)();
        }
    }

    /// Drop every pending callback without running it
    pub fn discard_pending(&self) {
        self.pending.lock().clear();
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn deadlines(&self) -> Vec<Instant> {
        self.pending.lock().iter().map(|p| p.deadline).collect()
    }

    pub fn cancelled(&self) -> Vec<TimerHandle> {
        self.cancelled.lock().clone()
    }
}

impl TimerPort for ManualTimer {
    fn now(&self) -> Instant {
        *self.now.lock()
    }

    fn schedule(&self, deadline: Instant, callback: TimerCallback) -> TimerHandle {
        let handle = {
            let mut id = self.next_id.lock();
            *id += 1;
            TimerHandle::new(*id)
        };
        self.pending.lock().push(Pending {
            handle,
            deadline,
            callback,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut pending = self.pending.lock();
        if let Some(pos) = pending.iter().position(|p| p.handle == handle) {
            pending.remove(pos);
            self.cancelled.lock().push(handle);
        }
    }
}
