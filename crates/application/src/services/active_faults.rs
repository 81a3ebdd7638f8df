//! Process-wide count of calls under active fault injection.

use std::sync::atomic::{AtomicU32, Ordering};

use domain::MaxFaults;
use tracing::warn;

/// Shared counter of currently faulted calls, bounded by a per-policy ceiling
///
/// One instance is shared (by `Arc` or reference) by every session of a
/// process. Tests create their own instances.
#[derive(Debug, Default)]
pub struct ActiveFaultCounter {
    active: AtomicU32,
}

impl ActiveFaultCounter {
    /// Create a counter with no active faults
    pub const fn new() -> Self {
        Self {
            active: AtomicU32::new(0),
        }
    }

    /// Take a fault slot if the ceiling allows it
    ///
    /// The check and the increment are a single compare-and-swap, so
    /// concurrent callers racing for the last slot cannot both win.
    pub fn try_begin_fault(&self, max_faults: MaxFaults) -> bool {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if max_faults.admits(current) {
                    current.checked_add(1)
                } else {
                    None
                }
            })
            .is_ok()
    }

    /// Give back a slot taken by `try_begin_fault`
    pub fn end_fault(&self) {
        let released = self
            .active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(1)
            });
        if released.is_err() {
            warn!("Active fault counter released more often than acquired; ignoring");
        }
    }

    /// Number of calls currently faulted
    pub fn active(&self) -> u32 {
        self.active.load(Ordering::Acquire)
    }
}
