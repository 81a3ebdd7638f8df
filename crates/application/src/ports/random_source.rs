//! Random source port
//!
//! Fault decisions draw from this port so tests can force outcomes.

#[cfg(test)]
use mockall::automock;

/// Uniform integer draws used to roll fault decisions
#[cfg_attr(test, automock)]
pub trait RandomSource: Send {
    /// Draw uniformly from `[0, bound)`. Callers never pass `bound == 0`.
    fn next_below(&mut self, bound: u32) -> u32;
}
