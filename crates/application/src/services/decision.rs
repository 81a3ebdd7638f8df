//! Random fault decisions
//!
//! Each call rolls its delay and abort decisions once, independently, so a
//! call may end up delayed, aborted, both, or neither.

use domain::{FaultInjectionPolicy, FractionalPercent};

use crate::ports::RandomSource;

/// Whether a draw falls within `pct`
///
/// Never draws for fractions that cannot fire or always fire.
pub fn under_fraction(pct: FractionalPercent, source: &mut dyn RandomSource) -> bool {
    if pct.is_never() {
        return false;
    }
    if pct.is_always() {
        return true;
    }
    source.next_below(pct.denominator()) < pct.numerator()
}

/// Outcome of rolling a policy for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decision {
    /// A delay should be injected
    pub delay: bool,
    /// An abort should be injected
    pub abort: bool,
}

impl Decision {
    /// Neither fault fires
    pub const fn is_inert(self) -> bool {
        !self.delay && !self.abort
    }
}

/// Rolls fault decisions from an injectable random source
pub struct RandomDecisionMaker<'r> {
    source: &'r mut dyn RandomSource,
}

impl std::fmt::Debug for RandomDecisionMaker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomDecisionMaker").finish_non_exhaustive()
    }
}

impl<'r> RandomDecisionMaker<'r> {
    /// Create a decision maker drawing from `source`
    pub fn new(source: &'r mut dyn RandomSource) -> Self {
        Self { source }
    }

    /// Roll whether to abort; an `OK` abort code never aborts
    pub fn roll_abort(&mut self, policy: &FaultInjectionPolicy) -> bool {
        !policy.abort_code.is_ok() && under_fraction(policy.abort_percentage, &mut *self.source)
    }

    /// Roll whether to delay; a zero delay never delays
    pub fn roll_delay(&mut self, policy: &FaultInjectionPolicy) -> bool {
        !policy.delay.is_zero() && under_fraction(policy.delay_percentage, &mut *self.source)
    }

    /// Roll both decisions, delay first
    pub fn roll(&mut self, policy: &FaultInjectionPolicy) -> Decision {
        let delay = self.roll_delay(policy);
        let abort = self.roll_abort(policy);
        Decision { delay, abort }
    }
}
