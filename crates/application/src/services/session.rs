//! Per-call fault-injection session.
//!
//! A session is created for every call whose method carries a fault-injection
//! policy and lives exactly as long as the call. It fixes the call's delay
//! and abort decisions at construction and then walks a small state machine:
//!
//! ```text
//! Idle -> DelayEvaluated -> [DelayArmed -> DelayElapsed] -> Aborted | PassThrough -> Closed
//! ```
//!
//! The call filter drives it in a fixed order:
//!
//! 1. [`FaultInjectionSession::maybe_delay`]; if true,
//!    [`FaultInjectionSession::schedule_next_pick`] and wait for the continuation
//! 2. [`FaultInjectionSession::maybe_abort`]; if true, fail the call with
//!    [`FaultInjectionSession::abort_error`]
//!
//! Both faults share a single slot of the [`ActiveFaultCounter`]. The slot is
//! released exactly once: on `abort_error`, on `close`, or when the session is
//! dropped, whichever comes first. Dropping a session with an armed delay also
//! cancels the timer, so a cancelled call never leaks a slot.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use domain::FaultInjectionPolicy;
use tracing::debug;

use super::active_faults::ActiveFaultCounter;
use super::decision::RandomDecisionMaker;
use crate::error::InjectedAbort;
use crate::ports::{RandomSource, TimerCallback, TimerHandle, TimerPort};

/// Observable state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, nothing evaluated yet
    Idle,
    /// Delay evaluated; no delay is pending
    DelayEvaluated,
    /// Delay timer armed, waiting for it to fire
    DelayArmed,
    /// Delay timer fired
    DelayElapsed,
    /// Abort injected
    Aborted,
    /// Abort evaluated and not injected; the call proceeds unmodified
    PassThrough,
    /// Fault slot released, session finished
    Closed,
}

/// Fault-injection state of a single call
pub struct FaultInjectionSession<'a> {
    policy: Cow<'a, FaultInjectionPolicy>,
    counter: &'a ActiveFaultCounter,
    timer: &'a dyn TimerPort,
    state: SessionState,

    delay_requested: bool,
    abort_requested: bool,

    delay_injected: bool,
    // written by the timer callback, possibly on another thread
    delay_finished: Arc<AtomicBool>,
    pick_again_time: Option<Instant>,
    timer_handle: Option<TimerHandle>,

    abort_injected: bool,
    abort_finished: bool,

    active_fault_increased: bool,
    active_fault_decreased: bool,
}

impl fmt::Debug for FaultInjectionSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjectionSession")
            .field("state", &self.state())
            .field("delay_requested", &self.delay_requested)
            .field("abort_requested", &self.abort_requested)
            .field("delay_injected", &self.delay_injected)
            .field("delay_finished", &self.delay_finished())
            .field("abort_injected", &self.abort_injected)
            .field("active_fault_increased", &self.active_fault_increased)
            .field("active_fault_decreased", &self.active_fault_decreased)
            .finish_non_exhaustive()
    }
}

impl<'a> FaultInjectionSession<'a> {
    /// Create a session and roll its delay and abort decisions
    pub fn new(
        policy: Cow<'a, FaultInjectionPolicy>,
        counter: &'a ActiveFaultCounter,
        timer: &'a dyn TimerPort,
        source: &mut dyn RandomSource,
    ) -> Self {
        let decision = RandomDecisionMaker::new(source).roll(&policy);
        debug!(
            delay = decision.delay,
            abort = decision.abort,
            "Rolled fault-injection decision"
        );

        Self {
            policy,
            counter,
            timer,
            state: SessionState::Idle,
            delay_requested: decision.delay,
            abort_requested: decision.abort,
            delay_injected: false,
            delay_finished: Arc::new(AtomicBool::new(false)),
            pick_again_time: None,
            timer_handle: None,
            abort_injected: false,
            abort_finished: false,
            active_fault_increased: false,
            active_fault_decreased: false,
        }
    }

    /// Whether the call should be suspended for an injected delay
    ///
    /// Returns false when no delay was rolled, when the delay already
    /// elapsed, or when the active-fault ceiling is reached. In the last case
    /// the delay is dropped for the rest of the call.
    pub fn maybe_delay(&mut self) -> bool {
        if self.state == SessionState::Idle {
            self.state = SessionState::DelayEvaluated;
        }
        if !self.delay_requested || self.delay_finished() {
            return false;
        }
        if self.delay_injected {
            return true;
        }

        let Some(deadline) = self.timer.now().checked_add(self.policy.delay) else {
            debug!(delay = ?self.policy.delay, "Injected delay out of range; skipping");
            self.delay_requested = false;
            return false;
        };
        if !self.begin_fault_injection() {
            debug!(
                max_faults = %self.policy.max_faults,
                "Active fault ceiling reached; skipping delay"
            );
            self.delay_requested = false;
            return false;
        }

        self.pick_again_time = Some(deadline);
        self.delay_injected = true;
        true
    }

    /// Arm the timer to run `continuation` once the injected delay elapses
    ///
    /// Must only follow a `maybe_delay` that returned true. Re-arming replaces
    /// the previous timer.
    pub fn schedule_next_pick(&mut self, continuation: TimerCallback) {
        debug_assert!(
            self.delay_injected,
            "schedule_next_pick called without an injected delay"
        );
        let Some(deadline) = self.pick_again_time.filter(|_| self.delay_injected) else {
            // nothing to wait for; resume right away rather than stall the call
            continuation();
            return;
        };
        if let Some(previous) = self.timer_handle.take() {
            self.timer.cancel(previous);
        }

        let finished = Arc::clone(&self.delay_finished);
        let handle = self.timer.schedule(
            deadline,
            Box::new(move || {
                finished.store(true, Ordering::Release);
                continuation();
            }),
        );
        self.timer_handle = Some(handle);
        self.state = SessionState::DelayArmed;
    }

    /// Give up on an injected delay whose continuation will never run
    ///
    /// For timers that drop a callback without invoking it. The delay counts
    /// as finished so the call may go on to `maybe_abort`; the fault slot is
    /// kept until the session releases it.
    pub fn abandon_delay(&mut self) {
        if !self.delay_injected || self.delay_finished() {
            return;
        }
        if let Some(handle) = self.timer_handle.take() {
            self.timer.cancel(handle);
        }
        self.delay_finished.store(true, Ordering::Release);
        self.state = SessionState::DelayElapsed;
        debug!("Abandoned injected delay");
    }

    /// Whether the call should fail with the injected abort
    ///
    /// Must be called after any injected delay has elapsed. Returns false when
    /// no abort was rolled or when the active-fault ceiling is reached; in the
    /// last case the abort is dropped for the rest of the call.
    pub fn maybe_abort(&mut self) -> bool {
        debug_assert!(
            !self.delay_injected || self.delay_finished(),
            "maybe_abort called before the injected delay elapsed"
        );
        if self.abort_injected {
            return true;
        }
        if !self.abort_requested {
            self.state = SessionState::PassThrough;
            return false;
        }
        if !self.begin_fault_injection() {
            debug!(
                max_faults = %self.policy.max_faults,
                "Active fault ceiling reached; skipping abort"
            );
            self.abort_requested = false;
            self.state = SessionState::PassThrough;
            return false;
        }

        self.abort_injected = true;
        self.state = SessionState::Aborted;
        true
    }

    /// The error an aborted call fails with
    ///
    /// Only meaningful after `maybe_abort` returned true. The aborted call is
    /// over at this point, so its fault slot is released.
    pub fn abort_error(&mut self) -> InjectedAbort {
        debug_assert!(
            self.abort_injected,
            "abort_error called without an injected abort"
        );
        self.abort_finished = true;
        self.end_fault_injection();
        InjectedAbort::new(self.policy.abort_code, self.policy.abort_message())
    }

    /// Finish the session: cancel a pending delay timer and release the slot
    ///
    /// Safe to call any number of times; dropping the session does the same.
    pub fn close(&mut self) {
        if let Some(handle) = self.timer_handle.take() {
            if !self.delay_finished() {
                self.timer.cancel(handle);
            }
        }
        self.end_fault_injection();
        self.state = SessionState::Closed;
    }

    /// Current state of the session
    pub fn state(&self) -> SessionState {
        if self.state == SessionState::DelayArmed && self.delay_finished() {
            SessionState::DelayElapsed
        } else {
            self.state
        }
    }

    /// The effective policy of this call
    pub fn policy(&self) -> &FaultInjectionPolicy {
        &self.policy
    }

    /// Whether a delay is (still) requested for this call
    pub const fn delay_requested(&self) -> bool {
        self.delay_requested
    }

    /// Whether an abort is (still) requested for this call
    pub const fn abort_requested(&self) -> bool {
        self.abort_requested
    }

    /// Whether a delay was injected
    pub const fn delay_injected(&self) -> bool {
        self.delay_injected
    }

    /// Whether the injected delay elapsed
    pub fn delay_finished(&self) -> bool {
        self.delay_finished.load(Ordering::Acquire)
    }

    /// Whether an abort was injected
    pub const fn abort_injected(&self) -> bool {
        self.abort_injected
    }

    /// Whether the abort error was produced
    pub const fn abort_finished(&self) -> bool {
        self.abort_finished
    }

    /// When the delayed call should resume, while a delay is injected
    pub const fn pick_again_time(&self) -> Option<Instant> {
        self.pick_again_time
    }

    /// Whether this session currently holds an active-fault slot
    pub const fn holds_fault_slot(&self) -> bool {
        self.active_fault_increased && !self.active_fault_decreased
    }

    fn begin_fault_injection(&mut self) -> bool {
        if self.active_fault_increased {
            return true;
        }
        if self.counter.try_begin_fault(self.policy.max_faults) {
            self.active_fault_increased = true;
            true
        } else {
            false
        }
    }

    fn end_fault_injection(&mut self) {
        if self.active_fault_increased && !self.active_fault_decreased {
            self.counter.end_fault();
            self.active_fault_decreased = true;
        }
    }
}

impl Drop for FaultInjectionSession<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
